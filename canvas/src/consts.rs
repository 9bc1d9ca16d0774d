//! Shared numeric constants for the canvas crate.

// ── Note cards ──────────────────────────────────────────────────

/// Width of every note card in canvas units.
pub const CARD_WIDTH: f64 = 220.0;

/// Height of every note card in canvas units.
pub const CARD_HEIGHT: f64 = 160.0;

/// Gap between adjacent cards in both layouts.
pub const CARD_GAP: f64 = 24.0;

// ── Grid layout ─────────────────────────────────────────────────

/// Column count for the ungrouped grid.
pub const GRID_COLS: usize = 5;

/// Canvas-space margin of the first grid cell (both axes).
pub const GRID_MARGIN: f64 = 60.0;

// ── Cluster layout ──────────────────────────────────────────────

/// Row pitch inside a cluster block; leaves room for reasoning under each card.
pub const CLUSTER_ROW_HEIGHT: f64 = CARD_HEIGHT + 100.0;

/// Top edge of every cluster block.
pub const CLUSTER_TOP: f64 = 100.0;

/// Horizontal space between consecutive cluster blocks.
pub const CLUSTER_SPACING: f64 = 80.0;

/// Minimum column count of a cluster block.
pub const MIN_CLUSTER_COLS: usize = 2;

/// Column count for the trailing block of unclustered notes.
pub const UNCLUSTERED_COLS: usize = 3;

/// Left edge of the first cluster block.
pub const CLUSTER_ORIGIN_X: f64 = 60.0;

// ── Import placement ────────────────────────────────────────────

/// Gap between existing content and notes imported into a clustered board.
pub const IMPORT_SPACING: f64 = 80.0;

/// Extra row space for notes imported into a clustered board.
pub const IMPORT_ROW_EXTRA: f64 = 60.0;

// ── Cluster boundaries ──────────────────────────────────────────

/// Rendered boundary padding: left, top, right, bottom.
pub const RENDER_PAD_LEFT: f64 = 20.0;
pub const RENDER_PAD_TOP: f64 = 40.0;
pub const RENDER_PAD_RIGHT: f64 = 20.0;
pub const RENDER_PAD_BOTTOM: f64 = 120.0;

/// Drop-target padding: left, top, right, bottom. Deliberately larger than
/// the rendered padding.
pub const HIT_PAD_LEFT: f64 = 40.0;
pub const HIT_PAD_TOP: f64 = 50.0;
pub const HIT_PAD_RIGHT: f64 = 40.0;
pub const HIT_PAD_BOTTOM: f64 = 140.0;

/// Empty-cluster placeholder size.
pub const PLACEHOLDER_WIDTH: f64 = CARD_WIDTH + 60.0;
pub const PLACEHOLDER_HEIGHT: f64 = CARD_HEIGHT + 80.0;

/// Start of the placeholder tracker.
pub const PLACEHOLDER_ORIGIN_X: f64 = 60.0;
pub const PLACEHOLDER_ORIGIN_Y: f64 = 60.0;

/// Tracker advance per empty cluster. One placeholder width, so consecutive
/// placeholders sit edge to edge: the first at x=60, the next at x=340.
pub const PLACEHOLDER_ADVANCE: f64 = PLACEHOLDER_WIDTH;

/// Clearance kept between a non-empty cluster's right edge and the next placeholder.
pub const PLACEHOLDER_CLEARANCE: f64 = 40.0;

/// How far outside its own drop-target boundary a note must land before it leaves its cluster.
pub const UNCLUSTER_MARGIN: f64 = 100.0;

/// Smallest box an interactive resize may produce (both axes).
pub const MIN_CLUSTER_SIZE: f64 = 200.0;

// ── Cluster chrome ──────────────────────────────────────────────

/// Radius of a corner resize handle, in canvas units.
pub const HANDLE_RADIUS: f64 = 7.0;

/// Label pill offset from the cluster's top-left corner.
pub const LABEL_OFFSET_X: f64 = 12.0;
pub const LABEL_OFFSET_Y: f64 = -24.0;

/// Label pill height and per-character width estimate.
pub const LABEL_HEIGHT: f64 = 20.0;
pub const LABEL_CHAR_WIDTH: f64 = 6.5;

/// Horizontal padding plus member-count badge allowance of the label pill.
pub const LABEL_PADDING: f64 = 36.0;

// ── Viewport ────────────────────────────────────────────────────

pub const MIN_SCALE: f64 = 0.2;
pub const MAX_SCALE: f64 = 3.0;

/// Per-tick wheel factors.
pub const WHEEL_ZOOM_OUT: f64 = 0.95;
pub const WHEEL_ZOOM_IN: f64 = 1.05;

/// Zoom button factors.
pub const BUTTON_ZOOM_IN: f64 = 1.2;
pub const BUTTON_ZOOM_OUT: f64 = 0.8;

/// Total padding added around content before fitting.
pub const FIT_PADDING: f64 = 120.0;

/// Scale cap for the one-shot fit after the first import.
pub const AUTO_FIT_MAX_SCALE: f64 = 1.2;

/// Scale cap for the fit-to-screen control.
pub const MANUAL_FIT_MAX_SCALE: f64 = 1.5;

/// Delay before the first-import fit runs, letting layout settle.
pub const AUTO_FIT_DELAY_MS: u64 = 100;

/// Screen offset from the viewport origin where manually added notes appear.
pub const NEW_NOTE_SCREEN_OFFSET: f64 = 200.0;

// ── Input ───────────────────────────────────────────────────────

/// Pointer travel (screen pixels) below which a press-release counts as a click.
pub const CLICK_SLOP_PX: f64 = 3.0;
