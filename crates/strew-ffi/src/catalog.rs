//! Handle-free accessors over the built-in map catalog.
//!
//! Map names travel one byte at a time (length + byte-at-index), matching
//! hosts that cannot receive pointers. Invalid indices read as −1 or 0.

use strew_maps::BUILTIN;

/// Number of maps in the built-in catalog.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_get_map_count() -> i32 {
    BUILTIN.len() as i32
}

fn map_field(index: i32, f: impl FnOnce(&strew_maps::MapData) -> i32) -> i32 {
    if index < 0 {
        return -1;
    }
    match BUILTIN.get(index as usize) {
        Some(map) => f(map),
        None => -1,
    }
}

/// Extent along x of a catalog map, or −1.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_get_map_size_x(index: i32) -> i32 {
    map_field(index, |m| m.size_x as i32)
}

/// Extent along y of a catalog map, or −1.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_get_map_size_y(index: i32) -> i32 {
    map_field(index, |m| m.size_y as i32)
}

/// Extent along z of a catalog map, or −1.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_get_map_size_z(index: i32) -> i32 {
    map_field(index, |m| m.size_z as i32)
}

/// Name length of a catalog map, or −1.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_get_map_name_length(index: i32) -> i32 {
    map_field(index, |m| m.name.len() as i32)
}

/// One byte of a catalog map's name, or 0 when either index is invalid.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_get_map_name_char(index: i32, char_index: i32) -> i32 {
    if index < 0 || char_index < 0 {
        return 0;
    }
    BUILTIN
        .get(index as usize)
        .and_then(|m| m.name.as_bytes().get(char_index as usize))
        .map(|&b| b as i32)
        .unwrap_or(0)
}
