//! Canvas interaction and layout engine for the research-synthesis board.
//!
//! This crate owns everything geometric about the board: converting pointer
//! events between screen and canvas space, placing notes with the grid and
//! cluster layouts, computing cluster boundaries, resolving drag gestures into
//! note/cluster mutations, marquee selection, and fitting content to the
//! viewport. The host layer wires input events to the engine and paints the
//! [`scene::Scene`] it produces.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Interaction controller: [`engine::EngineCore`] and [`engine::Action`] |
//! | [`doc`] | Notes, clusters, the [`doc::BoardStore`] port and the in-memory [`doc::DocStore`] |
//! | [`camera`] | Pan/zoom viewport and coordinate conversions |
//! | [`geom`] | Points and axis-aligned rectangles |
//! | [`layout`] | Deterministic grid and cluster auto-layout |
//! | [`bounds`] | Cluster display boundaries, drop-target boundaries, resize math |
//! | [`hit`] | Pointer hit-testing and drop resolution |
//! | [`input`] | Input event types and the gesture tagged union |
//! | [`selection`] | Marquee intersection and fit-to-content |
//! | [`scene`] | Read-only geometry handed to the renderer |
//! | [`listeners`] | Scoped host-event subscriptions |
//! | [`palette`] | Fixed cluster and note color palettes |
//! | [`consts`] | Shared numeric constants (card size, paddings, zoom limits, etc.) |

pub mod bounds;
pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod layout;
pub mod listeners;
pub mod palette;
pub mod scene;
pub mod selection;
