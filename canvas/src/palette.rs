//! Fixed color palettes. Both cycle by index.

#[cfg(test)]
#[path = "palette_test.rs"]
mod palette_test;

/// Boundary and label colors, indexed by cluster position.
pub const CLUSTER_COLORS: [&str; 8] = [
    "#C4A24E", // warm gold
    "#0066FF", // blue
    "#30A46C", // emerald
    "#E5484D", // coral red
    "#E5A000", // amber
    "#0D9AE0", // sky
    "#D4622A", // burnt orange
    "#2E8B8B", // teal
];

/// Card background colors, indexed by note or cluster position.
pub const NOTE_COLORS: [&str; 8] = [
    "#FBF3E0", // cream
    "#E2EAF8", // sky
    "#E2F1E6", // sage
    "#F8E2E6", // blush
    "#F8EBE2", // peach
    "#E0EFF4", // powder blue
    "#F0EBE2", // sand
    "#E4F0EA", // mint
];

#[must_use]
pub fn cluster_color(index: usize) -> &'static str {
    CLUSTER_COLORS[index % CLUSTER_COLORS.len()]
}

#[must_use]
pub fn note_color(index: usize) -> &'static str {
    NOTE_COLORS[index % NOTE_COLORS.len()]
}
