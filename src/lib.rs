//! Carfit is a vehicle parts configurator engine.
//!
//! A session starts from a catalog of part categories, each either exclusive (one option at a
//! time) or additive (any number). The engine:
//!
//! - Enforces the selection rules in a [`SelectionStore`]
//! - Renders the selection over the user's photo, as a layered [`LivePreview`] or a flattened
//!   [`RasterPreview`]
//! - Assembles [`GenerationRequest`]s for an external image provider and classifies the answer
//!   into a [`GenerationOutcome`], keeping only the newest attempt's result
//!
//! [`Configurator`] ties these together for one user session.
#![forbid(unsafe_code)]

pub mod assets;
pub mod catalog;
pub mod foundation;
pub mod generation;
pub mod render;
pub mod selection;
pub mod session;

pub use crate::assets::cache::OverlayCache;
pub use crate::assets::decode::{PreparedImage, decode_image};
pub use crate::assets::photo::Photo;
pub use crate::assets::source::{AssetSource, FsAssetSource, MemorySource};
pub use crate::catalog::model::{AnchorSpec, Catalog, PartCategory, PartOption, SelectionMode};
pub use crate::foundation::config::{
    ContractPolicy, EngineConfig, ProviderConfig, RasterSettings,
};
pub use crate::foundation::core::{CategoryId, PartId, Point, Rect, Rgba8Premul, Size, Vec2};
pub use crate::foundation::error::{CarfitError, CarfitResult};
pub use crate::generation::orchestrator::{
    AttemptEpoch, GenerationOrchestrator, GenerationState, PendingAttempt,
};
pub use crate::generation::outcome::{
    GENERIC_FAILURE_MESSAGE, GeneratedImage, GenerationOutcome, PLACEHOLDER_IMAGE_URL,
};
pub use crate::generation::request::{EncodedImage, GenerationRequest, PartPayload};
pub use crate::generation::transport::{
    DemoTransport, GenerationTransport, HttpTransport, TransportError, transport_for,
};
pub use crate::generation::wire::{GenerationResponse, WirePart, WireRequest};
pub use crate::render::compositor::{Compositor, FrameRGBA, PreviewScene, SkippedLayer};
pub use crate::render::live::{LiveLayer, LivePreview, LiveStackCompositor};
pub use crate::render::raster::{RasterCompositor, RasterPreview, overlay_placement};
pub use crate::selection::state::{SelectionChange, SelectionValue};
pub use crate::selection::store::SelectionStore;
pub use crate::session::Configurator;
