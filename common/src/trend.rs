//! CGM trend classification and its icon table.

/// Numeric id of a bitmap in the app's resource bundle.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResourceId(pub u32);

pub const RESOURCE_ID_ARROW_DOUBLE_UP: ResourceId = ResourceId(1);
pub const RESOURCE_ID_ARROW_SINGLE_UP: ResourceId = ResourceId(2);
pub const RESOURCE_ID_ARROW_FORTY_FIVE_UP: ResourceId = ResourceId(3);
pub const RESOURCE_ID_ARROW_FLAT: ResourceId = ResourceId(4);
pub const RESOURCE_ID_ARROW_FORTY_FIVE_DOWN: ResourceId = ResourceId(5);
pub const RESOURCE_ID_ARROW_SINGLE_DOWN: ResourceId = ResourceId(6);
pub const RESOURCE_ID_ARROW_DOUBLE_DOWN: ResourceId = ResourceId(7);

// =============================================================================
// Trend
// =============================================================================

/// Rate and direction of recent glucose change, as reported by the sensor.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Trend {
    None = 0,
    DoubleUp = 1,
    SingleUp = 2,
    FortyFiveUp = 3,
    Flat = 4,
    FortyFiveDown = 5,
    SingleDown = 6,
    DoubleDown = 7,
    NotComputable = 8,
    RateOutOfRange = 9,
}

impl Trend {
    pub const ALL: [Self; 10] = [
        Self::None,
        Self::DoubleUp,
        Self::SingleUp,
        Self::FortyFiveUp,
        Self::Flat,
        Self::FortyFiveDown,
        Self::SingleDown,
        Self::DoubleDown,
        Self::NotComputable,
        Self::RateOutOfRange,
    ];

    /// `None` for indices the sensor protocol does not define.
    pub const fn from_index(index: u8) -> Option<Self> {
        if (index as usize) < Self::ALL.len() {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> u8 { self as u8 }

    pub const fn icon(self) -> TrendIcon { TREND_ICONS[self as usize] }

    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::DoubleUp => "DOUBLE UP",
            Self::SingleUp => "SINGLE UP",
            Self::FortyFiveUp => "45 UP",
            Self::Flat => "FLAT",
            Self::FortyFiveDown => "45 DOWN",
            Self::SingleDown => "SINGLE DOWN",
            Self::DoubleDown => "DOUBLE DOWN",
            Self::NotComputable => "NOT COMPUTABLE",
            Self::RateOutOfRange => "OUT OF RANGE",
        }
    }
}

// =============================================================================
// Icon Table
// =============================================================================

/// What the trend arrow shows for a trend.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrendIcon {
    NoIcon,
    Icon(ResourceId),
}

/// Icon for each trend, indexed by [`Trend::index`].
pub const TREND_ICONS: [TrendIcon; 10] = [
    TrendIcon::NoIcon,
    TrendIcon::Icon(RESOURCE_ID_ARROW_DOUBLE_UP),
    TrendIcon::Icon(RESOURCE_ID_ARROW_SINGLE_UP),
    TrendIcon::Icon(RESOURCE_ID_ARROW_FORTY_FIVE_UP),
    TrendIcon::Icon(RESOURCE_ID_ARROW_FLAT),
    TrendIcon::Icon(RESOURCE_ID_ARROW_FORTY_FIVE_DOWN),
    TrendIcon::Icon(RESOURCE_ID_ARROW_SINGLE_DOWN),
    TrendIcon::Icon(RESOURCE_ID_ARROW_DOUBLE_DOWN),
    TrendIcon::NoIcon,
    TrendIcon::NoIcon,
];

const _: () = assert!(TREND_ICONS.len() == Trend::ALL.len());

/// Icon for a raw trend index. Indices past the table show no icon.
pub fn trend_icon(index: u8) -> TrendIcon {
    match Trend::from_index(index) {
        Some(trend) => trend.icon(),
        None => {
            warn!("trend index {} outside icon table", index);
            TrendIcon::NoIcon
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
