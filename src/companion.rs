//! Messages the companion phone app would send.
//!
//! The simulator has no phone, so the `P` key builds a "set preferences"
//! message here and feeds it to the store.

use heapless::Vec;
use watchface_common::config::{MAX_LAYOUT_ELEMENTS, NUM_ELEMENT_PROPERTIES};
use watchface_common::prefs::message::DictionaryFull;
use watchface_common::prefs::ElementKind;
use watchface_common::{Dictionary, ElementConfig, PrefKey, Preferences};

const ELEMENT_BYTES: usize = MAX_LAYOUT_ELEMENTS * NUM_ELEMENT_PROPERTIES;

/// Wire record for one element, in `ElementProperty` order.
fn element_record(element: &ElementConfig) -> [u8; NUM_ELEMENT_PROPERTIES] {
    [
        element.el.raw(),
        1, // enabled
        element.w,
        element.h,
        u8::from(element.black),
        u8::from(element.bottom),
        u8::from(element.right),
    ]
}

/// A message that keeps the current layout but flips the sidebar's color
/// scheme, and nudges a few scalar settings.
///
/// Values past field widths are sent on purpose to show truncation.
pub fn toggle_sidebar_message(prefs: &Preferences) -> Result<Dictionary, DictionaryFull> {
    let mut elements: Vec<u8, ELEMENT_BYTES> = Vec::new();
    for element in prefs.elements() {
        let mut element = *element;
        if element.el == ElementKind::Sidebar {
            element.black = !element.black;
        }
        // Capacity covers every element
        elements.extend_from_slice(&element_record(&element)).ok();
    }

    Dictionary::new()
        .with_uint(PrefKey::NumElements, prefs.num_elements() as u32)?
        .with_bytes(PrefKey::Elements, &elements)?
        .with_uint(PrefKey::TopOfGraph, u32::from(prefs.top_of_graph) + 10)?
        // 5-bit field: 44 stores as 12
        .with_uint(PrefKey::BasalHeight, 44)?
        .with_int(PrefKey::PointMargin, -1)
}

// =============================================================================
// Tests
// =============================================================================
