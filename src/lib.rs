//! Scene editor for physics-level layouts.
//!
//! A level is a set of polygonal shapes with pose, physical properties,
//! static pins, and tethers to shared anchors. The editor loads a level's
//! JSON twin, lets the user pan, zoom, select, move, duplicate, and delete
//! shapes, and writes the result back through an external converter that
//! owns the game's binary format.
//!
//! Nothing here owns a window. Input arrives as [`input::InputEvent`]s,
//! drawing goes to any [`render::Surface`], and the binary drives both from
//! a text event script.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Interaction state machine over scene, camera, and overlay flags |
//! | [`scene`] | Shapes, anchors, and the editing operations on them |
//! | [`geometry`] | Centroid, rotation, and bounding boxes |
//! | [`camera`] | Pan/zoom camera and world/screen conversions (Y-up world, Y-down screen) |
//! | [`input`] | Input events, their text form, and gesture state |
//! | [`hit`] | Screen-space hitboxes and rectangle selection |
//! | [`render`] | Draw pass over a backend-agnostic [`render::Surface`] |
//! | [`raster`] | tiny-skia surface for PNG snapshots |
//! | [`layout`] | Level document load/save |
//! | [`converter`] | External converter boundary |
//! | [`discovery`] | Finding levels and deciding when to convert |
//! | [`session`] | Headless editing session driven by event lines |
//! | [`config`] | Environment configuration |
//! | [`consts`] | Shared constants (zoom limits, colors, converter codes) |

pub mod camera;
pub mod config;
pub mod consts;
pub mod converter;
pub mod discovery;
pub mod engine;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod layout;
pub mod raster;
pub mod render;
pub mod scene;
pub mod session;
