//! Enumerated option sets stored in preference bitfields.
//!
//! Every enum records the width of the field that stores it. Discriminants
//! are the wire values the companion app sends, so variant order here must
//! not change without bumping the schema version.
//!
//! Preference fields hold an [`EnumBits`], not the enum itself: the field
//! keeps whatever `value mod 2^BITS` it was given, including values that
//! name no variant, and callers decode it when they read it.

use core::fmt;
use core::marker::PhantomData;

use super::bits::truncate;

/// An enum stored in a fixed-width bitfield.
pub trait BitEnum: Sized + Copy + Default + PartialEq + fmt::Debug {
    /// Width of the backing field.
    const BITS: u32;

    /// Map a raw field value to a variant, if one exists.
    fn from_bits(raw: u8) -> Option<Self>;

    /// Raw field value of this variant.
    fn to_bits(self) -> u8;
}

// =============================================================================
// Enum Bitfield
// =============================================================================

/// Raw contents of an `E::BITS`-wide enum bitfield.
pub struct EnumBits<E> {
    raw: u8,
    kind: PhantomData<E>,
}

impl<E: BitEnum> EnumBits<E> {
    /// Store `value mod 2^E::BITS`, whether or not it names a variant.
    #[inline]
    pub fn wrapping(value: u32) -> Self {
        Self {
            raw: truncate(value, E::BITS) as u8,
            kind: PhantomData,
        }
    }

    #[inline]
    pub const fn raw(self) -> u8 { self.raw }

    /// The stored variant; `None` if the raw value names none.
    #[inline]
    pub fn get(self) -> Option<E> { E::from_bits(self.raw) }

    /// The stored variant, or the default for values that name none.
    pub fn or_default(self) -> E {
        self.get().unwrap_or_else(|| {
            warn!("enum field value {} names no option, using default", self.raw);
            E::default()
        })
    }
}

impl<E> Clone for EnumBits<E> {
    fn clone(&self) -> Self { *self }
}

impl<E> Copy for EnumBits<E> {}

impl<E> PartialEq for EnumBits<E> {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.raw == other.raw
    }
}

impl<E> Eq for EnumBits<E> {}

impl<E: BitEnum> PartialEq<E> for EnumBits<E> {
    fn eq(
        &self,
        other: &E,
    ) -> bool {
        self.raw == other.to_bits()
    }
}

impl<E: BitEnum> From<E> for EnumBits<E> {
    fn from(value: E) -> Self {
        Self {
            raw: value.to_bits(),
            kind: PhantomData,
        }
    }
}

impl<E: BitEnum> Default for EnumBits<E> {
    fn default() -> Self { E::default().into() }
}

impl<E: BitEnum> fmt::Debug for EnumBits<E> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self.get() {
            Some(value) => fmt::Debug::fmt(&value, f),
            None => write!(f, "Unknown({})", self.raw),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for EnumBits<E> {
    fn format(
        &self,
        f: defmt::Formatter<'_>,
    ) {
        defmt::write!(f, "{=u8}", self.raw);
    }
}

macro_rules! bit_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident : $bits:literal {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $value:literal
            ),+ $(,)?
        }
        default = $default:ident;
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        #[repr(u8)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant = $value,
            )+
        }

        impl Default for $name {
            fn default() -> Self { Self::$default }
        }

        impl BitEnum for $name {
            const BITS: u32 = $bits;

            fn from_bits(raw: u8) -> Option<Self> {
                match raw {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }

            #[inline]
            fn to_bits(self) -> u8 { self as u8 }
        }

        $(const _: () = assert!(($value as u32) < (1u32 << $bits));)+
    };
}

bit_enum! {
    /// Horizontal alignment of the time text.
    pub enum TimeAlign: 2 {
        Left = 0,
        Center = 1,
        Right = 2,
    }
    default = Center;
}

bit_enum! {
    /// Where the watch battery indicator is drawn.
    pub enum BatteryLoc: 3 {
        None = 0,
        StatusRight = 1,
        TimeTopLeft = 2,
        TimeTopRight = 3,
        TimeBottomLeft = 4,
        TimeBottomRight = 5,
    }
    default = StatusRight;
}

bit_enum! {
    /// Where the phone connection status icon is drawn.
    pub enum ConnStatusLoc: 2 {
        None = 0,
        GraphTopLeft = 1,
        GraphBottomLeft = 2,
    }
    default = GraphTopLeft;
}

bit_enum! {
    /// Where the data recency indicator is drawn.
    pub enum RecencyLoc: 4 {
        None = 0,
        GraphTopLeft = 1,
        GraphBottomLeft = 2,
        StatusTopRight = 3,
        StatusBottomRight = 4,
        TimeTopLeft = 5,
        TimeTopRight = 6,
        TimeBottomLeft = 7,
        TimeBottomRight = 8,
    }
    default = StatusTopRight;
}

bit_enum! {
    /// Size and decoration of the recency indicator.
    pub enum RecencyStyle: 3 {
        SmallNoCircle = 0,
        MediumPie = 1,
        MediumRing = 2,
        MediumNoCircle = 3,
        LargePie = 4,
        LargeRing = 5,
        LargeNoCircle = 6,
    }
    default = MediumPie;
}

bit_enum! {
    /// Shape of each plotted reading.
    pub enum PointShape: 2 {
        Rectangle = 0,
        Circle = 1,
    }
    default = Rectangle;
}

bit_enum! {
    /// How recency is formatted inside the status bar text.
    pub enum StatusRecencyFormat: 3 {
        /// `(3) text`
        ParenLeft = 0,
        /// `[3] text`
        BracketLeft = 1,
        /// `3: text`
        ColonLeft = 2,
        /// `3) text`
        CloseParenLeft = 3,
        /// `3 text`
        PlainLeft = 4,
        /// `text (3)`
        ParenRight = 5,
        /// `text [3]`
        BracketRight = 6,
    }
    default = ParenLeft;
}

bit_enum! {
    /// Layout element kinds.
    pub enum ElementKind: 3 {
        Graph = 0,
        Sidebar = 1,
        StatusBar = 2,
        TimeArea = 3,
        BgRow = 4,
    }
    default = Graph;
}

/// Index into the preferences color table.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ColorKey {
    PointDefault = 0,
    PointHigh = 1,
    PointLow = 2,
    PlotLine = 3,
    RecencyCircle = 4,
    RecencyText = 5,
}

impl ColorKey {
    /// All keys in table order.
    pub const ALL: [Self; crate::config::NUM_COLOR_KEYS] = [
        Self::PointDefault,
        Self::PointHigh,
        Self::PointLow,
        Self::PlotLine,
        Self::RecencyCircle,
        Self::RecencyText,
    ];

    #[inline]
    pub const fn index(self) -> usize { self as usize }
}

/// Byte offsets of each property within one element of the inbound layout array.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum ElementProperty {
    Type = 0,
    Enabled = 1,
    Width = 2,
    Height = 3,
    Black = 4,
    Bottom = 5,
    Right = 6,
}

const _: () = assert!(ElementProperty::Right as usize + 1 == crate::config::NUM_ELEMENT_PROPERTIES);

// =============================================================================
// Unit Tests
// =============================================================================
