//! The set of subsystems the boot sequencer wires together
//!
//! The manager never constructs subsystems itself. The application supplies a
//! [`SystemCatalog`] naming one concrete type per known system, and the boot
//! sequencer pulls each system from it right before registering it.

use super::config::{
    CameraSystemConfig, FontSystemConfig, GeometrySystemConfig, MaterialSystemConfig, ResourceConfig,
    ShaderSystemConfig, TextureSystemConfig,
};
use super::jobs::JobSystemConfig;
use super::{InitializeSystem, PlatformSystem, RenderViewSystem, RendererSystem, Subsystem};

/// Factory for every known engine subsystem
pub trait SystemCatalog {
    /// Memory system (registered without an initialize step)
    type Memory: Subsystem;
    /// Developer console
    type Console: InitializeSystem<Config = ()>;
    /// Console variables
    type Variables: InitializeSystem<Config = ()>;
    /// Event dispatch
    type Events: InitializeSystem<Config = ()>;
    /// Log output
    type Logging: InitializeSystem<Config = ()>;
    /// Input state
    type Input: InitializeSystem<Config = ()>;
    /// Platform layer
    type Platform: PlatformSystem;
    /// Resource loading
    type Resource: InitializeSystem<Config = ResourceConfig>;
    /// Shader registry
    type Shader: InitializeSystem<Config = ShaderSystemConfig>;
    /// Renderer frontend
    type Renderer: RendererSystem;
    /// Job scheduler
    type Job: InitializeSystem<Config = JobSystemConfig>;
    /// Textures
    type Texture: InitializeSystem<Config = TextureSystemConfig>;
    /// Fonts
    type Font: InitializeSystem<Config = FontSystemConfig>;
    /// Cameras
    type Camera: InitializeSystem<Config = CameraSystemConfig>;
    /// Render views
    type RenderView: RenderViewSystem;
    /// Materials
    type Material: InitializeSystem<Config = MaterialSystemConfig>;
    /// Geometry
    type Geometry: InitializeSystem<Config = GeometrySystemConfig>;

    /// Create the memory system
    fn memory(&mut self) -> Self::Memory;
    /// Create the console system
    fn console(&mut self) -> Self::Console;
    /// Create the console variable system
    fn variables(&mut self) -> Self::Variables;
    /// Create the event system
    fn events(&mut self) -> Self::Events;
    /// Create the logging system
    fn logging(&mut self) -> Self::Logging;
    /// Create the input system
    fn input(&mut self) -> Self::Input;
    /// Create the platform system
    fn platform(&mut self) -> Self::Platform;
    /// Create the resource system
    fn resource(&mut self) -> Self::Resource;
    /// Create the shader system
    fn shader(&mut self) -> Self::Shader;
    /// Create the renderer system
    fn renderer(&mut self) -> Self::Renderer;
    /// Create the job system
    fn job(&mut self) -> Self::Job;
    /// Create the texture system
    fn texture(&mut self) -> Self::Texture;
    /// Create the font system
    fn font(&mut self) -> Self::Font;
    /// Create the camera system
    fn camera(&mut self) -> Self::Camera;
    /// Create the render view system
    fn render_view(&mut self) -> Self::RenderView;
    /// Create the material system
    fn material(&mut self) -> Self::Material;
    /// Create the geometry system
    fn geometry(&mut self) -> Self::Geometry;
}
