//! Layout codec: the JSON level document ⇄ [`Scene`].
//!
//! DESIGN
//! ======
//! A level document is a large JSON object of which the editor understands
//! only `m_CustomShapes`, `m_Anchors`, and the mirrored `m_Bridge.m_Anchors`.
//! Everything else is kept in a [`LayoutDocument`] and written back untouched.
//!
//! Rotation is persisted as a unit quaternion and held in memory as Euler
//! degrees. Shape points are baked (scaled and Z-rotated) at load time, and
//! saved as they are: scale is written as unity and the retained Euler
//! rotation is written back unchanged. Reopening a saved level therefore
//! rotates any Z-rotated shape a second time.
//!
//! ERROR HANDLING
//! ==============
//! Load errors are fatal to the session and carry enough context to find
//! the fault. Save errors leave the in-memory scene intact so the user can
//! retry; converter stdout is carried verbatim.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glam::{DQuat, EulerRot};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::camera::Point;
use crate::converter::{Converter, ConverterError, ConverterStatus};
use crate::geometry::GeometryError;
use crate::scene::{Anchor, Position, Scene, Scale, Shape};

pub const CUSTOM_SHAPES: &str = "m_CustomShapes";
pub const ANCHORS: &str = "m_Anchors";
pub const BRIDGE: &str = "m_Bridge";

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("layout file not found: {}", path.display())]
    FileNotFound { path: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("syntax error in line {line}, column {column}: {message}")]
    MalformedDocument { line: usize, column: usize, message: String },
    #[error("layout is incomplete or not a valid level: missing `{field}`")]
    MissingRequiredField { field: String },
    #[error("shape {index} is invalid: {message}")]
    InvalidShape { index: usize, message: String },
    #[error("anchor {index} is invalid: {message}")]
    InvalidAnchor { index: usize, message: String },
    #[error("shape {index}: {source}")]
    Geometry { index: usize, source: GeometryError },
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("failed to serialize layout: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("cannot find converter `{program}`")]
    ConverterNotFound { program: String },
    #[error("converter could not access the file:\n{stdout}")]
    ConverterFileError { stdout: String },
    #[error("conversion failed:\n{stdout}")]
    ConverterConversionError { stdout: String },
    #[error("game installation not found:\n{stdout}")]
    GameInstallNotFound { stdout: String },
    #[error("unexpected converter error (exit code {code:?}):\n{stdout}")]
    ConverterUnexpectedError { code: Option<i32>, stdout: String },
}

impl From<ConverterError> for SaveError {
    fn from(err: ConverterError) -> Self {
        match err {
            ConverterError::NotFound { program } => Self::ConverterNotFound { program },
            ConverterError::Spawn { program, source } => Self::ConverterUnexpectedError {
                code: None,
                stdout: format!("failed to run {program}: {source}"),
            },
            ConverterError::GameNotFound { stdout } => Self::GameInstallNotFound { stdout },
            ConverterError::Failed { code, stdout } => Self::ConverterUnexpectedError { code, stdout },
        }
    }
}

/// A successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The converter ran but had nothing to write.
    NoChanges { stdout: String },
    /// The binary layout was rewritten.
    Applied { backup_created: bool, stdout: String },
}

// =============================================================================
// RECORDS
// =============================================================================

/// Persisted quaternion, stored `{x, y, z, w}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuatRecord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

/// Persisted color, channels in 0–1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorRecord {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// One entry of `m_CustomShapes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    #[serde(rename = "m_Pos")]
    pub pos: Position,
    #[serde(rename = "m_Rot")]
    pub rot: QuatRecord,
    #[serde(rename = "m_Scale")]
    pub scale: Scale,
    #[serde(rename = "m_Dynamic")]
    pub dynamic: bool,
    #[serde(rename = "m_CollidesWithRoad")]
    pub collides_with_road: bool,
    #[serde(rename = "m_CollidesWithNodes")]
    pub collides_with_nodes: bool,
    #[serde(rename = "m_Flipped")]
    pub flipped: bool,
    #[serde(rename = "m_RotationDegrees")]
    pub rotation_degrees: f64,
    #[serde(rename = "m_Mass")]
    pub mass: f64,
    #[serde(rename = "m_Bounciness")]
    pub bounciness: f64,
    #[serde(rename = "m_PinMotorStrength")]
    pub pin_motor_strength: f64,
    #[serde(rename = "m_PinTargetVelocity")]
    pub pin_target_velocity: f64,
    #[serde(rename = "m_Color")]
    pub color: ColorRecord,
    #[serde(rename = "m_PointsLocalSpace")]
    pub points_local_space: Vec<Point>,
    #[serde(rename = "m_StaticPins")]
    pub static_pins: Vec<Position>,
    #[serde(rename = "m_DynamicAnchorGuids")]
    pub dynamic_anchor_guids: Vec<String>,
    #[serde(rename = "m_UndoGuid", default)]
    pub undo_guid: Option<String>,
}

// =============================================================================
// ROTATION
// =============================================================================

/// Quaternion to Euler degrees `[x, y, z]` (roll, pitch, yaw; Z-Y-X order).
#[must_use]
pub fn quat_to_euler_degrees(q: QuatRecord) -> [f64; 3] {
    let (z, y, x) = DQuat::from_xyzw(q.x, q.y, q.z, q.w).to_euler(EulerRot::ZYX);
    [x.to_degrees(), y.to_degrees(), z.to_degrees()]
}

/// Euler degrees `[x, y, z]` to a quaternion (Z-Y-X order).
#[must_use]
pub fn euler_degrees_to_quat([x, y, z]: [f64; 3]) -> QuatRecord {
    let q = DQuat::from_euler(EulerRot::ZYX, z.to_radians(), y.to_radians(), x.to_radians());
    QuatRecord { x: q.x, y: q.y, z: q.z, w: q.w }
}

// =============================================================================
// SHAPE MAPPING
// =============================================================================

/// Build a working shape from its record, baking scale and Z rotation into the points.
///
/// # Errors
///
/// Returns [`GeometryError::EmptyPolygon`] if the record has no points.
pub fn shape_from_record(record: ShapeRecord) -> Result<Shape, GeometryError> {
    let rotation = quat_to_euler_degrees(record.rot);
    let points = Shape::bake_points(&record.points_local_space, record.scale, rotation[2])?;
    let ColorRecord { r, g, b, a } = record.color;
    Ok(Shape {
        position: record.pos,
        points,
        scale: record.scale,
        rotation,
        rotation_degrees: record.rotation_degrees,
        color: [r * 255.0, g * 255.0, b * 255.0],
        fill_color: [r * 255.0, g * 255.0, b * 255.0, a * 255.0],
        static_pins: record.static_pins,
        dynamic_anchors: record.dynamic_anchor_guids,
        dynamic: record.dynamic,
        collides_with_road: record.collides_with_road,
        collides_with_nodes: record.collides_with_nodes,
        flipped: record.flipped,
        mass: record.mass,
        bounciness: record.bounciness,
        pin_motor_strength: record.pin_motor_strength,
        pin_target_velocity: record.pin_target_velocity,
        highlighted: false,
    })
}

/// Persisted form of a working shape: baked points, unity scale, opaque color.
#[must_use]
pub fn shape_to_record(shape: &Shape) -> ShapeRecord {
    let [r, g, b] = shape.color;
    ShapeRecord {
        pos: shape.position.clone(),
        rot: euler_degrees_to_quat(shape.rotation),
        scale: Scale::default(),
        dynamic: shape.dynamic,
        collides_with_road: shape.collides_with_road,
        collides_with_nodes: shape.collides_with_nodes,
        flipped: shape.flipped,
        rotation_degrees: shape.rotation_degrees,
        mass: shape.mass,
        bounciness: shape.bounciness,
        pin_motor_strength: shape.pin_motor_strength,
        pin_target_velocity: shape.pin_target_velocity,
        color: ColorRecord { r: r / 255.0, g: g / 255.0, b: b / 255.0, a: 1.0 },
        points_local_space: shape.points.clone(),
        static_pins: shape.static_pins.clone(),
        dynamic_anchor_guids: shape.dynamic_anchors.clone(),
        undo_guid: None,
    }
}

// =============================================================================
// DOCUMENT
// =============================================================================

/// The full level document as loaded, minus nothing. Used as the template on save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutDocument {
    root: Map<String, Value>,
}

impl LayoutDocument {
    /// The pass-through value of a top-level field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// The document with `scene` written into its shape and anchor fields.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if a record cannot be encoded.
    pub fn with_scene(&self, scene: &Scene) -> Result<Value, serde_json::Error> {
        let shapes = scene
            .shapes()
            .iter()
            .map(|s| serde_json::to_value(shape_to_record(s)))
            .collect::<Result<Vec<_>, _>>()?;
        let anchors = serde_json::to_value(scene.anchors().collect::<Vec<_>>())?;

        let mut root = self.root.clone();
        root.insert(CUSTOM_SHAPES.into(), Value::Array(shapes));
        root.insert(ANCHORS.into(), anchors.clone());
        let bridge = root
            .entry(BRIDGE)
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(bridge) = bridge.as_object_mut() {
            bridge.insert(ANCHORS.into(), anchors);
        } else {
            warn!("m_Bridge is not an object; anchors not mirrored");
        }
        Ok(Value::Object(root))
    }
}

/// Parse a level document from text.
///
/// # Errors
///
/// See [`LoadError`]; file variants are never returned here.
pub fn parse_layout(text: &str) -> Result<(Scene, LayoutDocument), LoadError> {
    let value: Value = serde_json::from_str(text).map_err(|e| LoadError::MalformedDocument {
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })?;
    let Value::Object(root) = value else {
        return Err(LoadError::MissingRequiredField { field: CUSTOM_SHAPES.into() });
    };

    let shape_values = required_array(&root, CUSTOM_SHAPES)?;
    let anchor_values = required_array(&root, ANCHORS)?;

    let mut shapes = Vec::with_capacity(shape_values.len());
    for (index, raw) in shape_values.iter().enumerate() {
        let record: ShapeRecord = serde_json::from_value(raw.clone())
            .map_err(|e| LoadError::InvalidShape { index, message: e.to_string() })?;
        shapes.push(shape_from_record(record).map_err(|source| LoadError::Geometry { index, source })?);
    }

    let mut anchors = Vec::with_capacity(anchor_values.len());
    for (index, raw) in anchor_values.iter().enumerate() {
        let anchor: Anchor = serde_json::from_value(raw.clone())
            .map_err(|e| LoadError::InvalidAnchor { index, message: e.to_string() })?;
        anchors.push(anchor);
    }

    Ok((Scene::from_parts(shapes, anchors), LayoutDocument { root }))
}

fn required_array<'a>(root: &'a Map<String, Value>, field: &str) -> Result<&'a Vec<Value>, LoadError> {
    root.get(field)
        .and_then(Value::as_array)
        .ok_or_else(|| LoadError::MissingRequiredField { field: field.to_owned() })
}

/// Load a level document from disk.
///
/// # Errors
///
/// [`LoadError::FileNotFound`] if the path does not exist, otherwise any
/// parse error from [`parse_layout`].
pub fn load_scene(path: &Path) -> Result<(Scene, LayoutDocument), LoadError> {
    let text = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            LoadError::FileNotFound { path: path.to_path_buf() }
        } else {
            LoadError::Io { path: path.to_path_buf(), source }
        }
    })?;
    let (scene, document) = parse_layout(&text)?;
    info!(
        path = %path.display(),
        shapes = scene.shape_count(),
        anchors = scene.anchor_count(),
        "layout loaded"
    );
    Ok((scene, document))
}

/// Write `scene` into `document`, save it to `path`, and run the converter on it.
///
/// The scene is only read; on error it is still valid for another attempt.
///
/// # Errors
///
/// See [`SaveError`].
pub fn save_scene(
    scene: &Scene,
    document: &LayoutDocument,
    path: &Path,
    converter: &dyn Converter,
) -> Result<SaveOutcome, SaveError> {
    info!(path = %path.display(), shapes = scene.shape_count(), "saving layout");
    let json = serde_json::to_string(&document.with_scene(scene)?)?;
    fs::write(path, json).map_err(|source| SaveError::Write { path: path.to_path_buf(), source })?;

    let output = converter.invoke(path)?;
    match output.status() {
        ConverterStatus::Success if !output.reports_changes() => Ok(SaveOutcome::NoChanges { stdout: output.stdout }),
        ConverterStatus::Success => Ok(SaveOutcome::Applied {
            backup_created: output.stdout.contains("backup"),
            stdout: output.stdout,
        }),
        ConverterStatus::FileError => Err(SaveError::ConverterFileError { stdout: output.stdout }),
        ConverterStatus::ConversionFailed => Err(SaveError::ConverterConversionError { stdout: output.stdout }),
        ConverterStatus::GameNotFound => Err(SaveError::GameInstallNotFound { stdout: output.stdout }),
        ConverterStatus::MalformedInput | ConverterStatus::Other(_) => {
            Err(SaveError::ConverterUnexpectedError { code: output.code, stdout: output.stdout })
        }
    }
}
