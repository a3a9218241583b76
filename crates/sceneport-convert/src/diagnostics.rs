use std::fmt;

/// Which converter subsystem raised a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Scene,
    Armature,
    Mesh,
    Material,
    Texture,
    Animation,
}

impl Component {
    fn name(&self) -> &'static str {
        match self {
            Self::Scene => "scene",
            Self::Armature => "armature",
            Self::Mesh => "mesh",
            Self::Material => "material",
            Self::Texture => "texture",
            Self::Animation => "animation",
        }
    }
}

/// Recoverable conditions. Each one is skipped or defaulted individually;
/// the conversion as a whole still succeeds.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    MissingTexture { reference: String, base: String },
    EmbeddedTextureUnavailable { reference: String },
    EmbeddedTextureDecodeFailed { index: usize, message: String },
    UnrecognizedProperty { key: String },
    PropertyValueMismatch { key: String },
    UnknownAlphaMode { value: String },
    MaterialIndexOutOfRange { index: usize },
    DuplicateBoneName { name: String },
    UnresolvedBoneParent { parent: String },
    UnresolvedBoneInfluence { bone: String },
    SkinWithoutArmature,
    TruncatedInfluences { vertices: usize, max: usize },
    WeightSumOutOfRange { vertex: usize, sum: f32 },
    DroppedKeyframes { dropped: usize },
    ShortTrack { kept: usize },
    UnresolvedChannelTarget { target: String },
    EmptyClip,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTexture { reference, base } => {
                write!(f, "texture '{reference}' not found under {base}")
            }
            Self::EmbeddedTextureUnavailable { reference } => {
                write!(f, "embedded texture reference '{reference}' is out of range or undecodable")
            }
            Self::EmbeddedTextureDecodeFailed { index, message } => {
                write!(f, "embedded texture {index} failed to decode: {message}")
            }
            Self::UnrecognizedProperty { key } => write!(f, "unrecognized property '{key}'"),
            Self::PropertyValueMismatch { key } => {
                write!(f, "property '{key}' has an unexpected value type")
            }
            Self::UnknownAlphaMode { value } => {
                write!(f, "unknown alpha mode '{value}', defaulting to opaque")
            }
            Self::MaterialIndexOutOfRange { index } => {
                write!(f, "material index {index} out of range, using default material")
            }
            Self::DuplicateBoneName { name } => {
                write!(f, "duplicate bone name '{name}', keeping the first occurrence")
            }
            Self::UnresolvedBoneParent { parent } => {
                write!(f, "parent bone '{parent}' not found, treating as root")
            }
            Self::UnresolvedBoneInfluence { bone } => {
                write!(f, "influence references unknown bone '{bone}'")
            }
            Self::SkinWithoutArmature => {
                write!(f, "mesh carries influences but the scene has no bones")
            }
            Self::TruncatedInfluences { vertices, max } => {
                write!(f, "{vertices} vertices exceeded {max} influences and were truncated")
            }
            Self::WeightSumOutOfRange { vertex, sum } => {
                write!(f, "vertex {vertex} weights sum to {sum}")
            }
            Self::DroppedKeyframes { dropped } => {
                write!(f, "dropped {dropped} degenerate keyframes")
            }
            Self::ShortTrack { kept } => {
                write!(f, "track has {kept} usable keyframes, dropping it")
            }
            Self::UnresolvedChannelTarget { target } => {
                write!(f, "channel target '{target}' matches no joint or node")
            }
            Self::EmptyClip => write!(f, "clip has no usable tracks, omitting it"),
        }
    }
}

/// One structured record: which component, on which entity, what happened.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub component: Component,
    pub subject: String,
    pub kind: DiagnosticKind,
}

/// Collects structured diagnostics during one conversion and mirrors them to
/// the logger as they are recorded.
pub struct Diagnostics {
    records: Vec<Diagnostic>,
    verbose: bool,
}

impl Diagnostics {
    pub fn new(verbose: bool) -> Self {
        Self {
            records: Vec::new(),
            verbose,
        }
    }

    pub fn record(&mut self, component: Component, subject: impl Into<String>, kind: DiagnosticKind) {
        let subject = subject.into();
        log::warn!("{} '{}': {}", component.name(), subject, kind);
        self.records.push(Diagnostic {
            component,
            subject,
            kind,
        });
    }

    /// Low-severity variant for conditions that are routine in real assets
    /// (e.g. vendor-specific material keys).
    pub fn record_minor(
        &mut self,
        component: Component,
        subject: impl Into<String>,
        kind: DiagnosticKind,
    ) {
        let subject = subject.into();
        log::debug!("{} '{}': {}", component.name(), subject, kind);
        self.records.push(Diagnostic {
            component,
            subject,
            kind,
        });
    }

    /// Per-resource progress trace, only emitted in verbose mode.
    pub fn trace(&self, message: fmt::Arguments<'_>) {
        if self.verbose {
            log::debug!("{message}");
        }
    }

    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Diagnostic> {
        self.records
    }
}
