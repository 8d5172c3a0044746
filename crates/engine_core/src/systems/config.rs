//! Per-subsystem configuration records
//!
//! Each boot step hands its subsystem one of these records. Most are derived
//! from the [`ApplicationConfig`]; the font configuration and the render view
//! descriptors are supplied by the application verbatim.

use serde::{Deserialize, Serialize};

use crate::core::config::ApplicationConfig;

/// Platform layer configuration (window creation)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Application name, used as the window title
    pub application_name: String,
    /// Initial window x position
    pub x: i32,
    /// Initial window y position
    pub y: i32,
    /// Initial window width
    pub width: u32,
    /// Initial window height
    pub height: u32,
}

impl From<&ApplicationConfig> for PlatformConfig {
    fn from(app: &ApplicationConfig) -> Self {
        Self {
            application_name: app.name.clone(),
            x: app.window.x,
            y: app.window.y,
            width: app.window.width,
            height: app.window.height,
        }
    }
}

/// Resource system configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceConfig {
    /// Root directory all resource paths are resolved against
    pub asset_base_path: String,
    /// Maximum number of registered resource loaders
    pub max_loader_count: u32,
}

impl From<&ApplicationConfig> for ResourceConfig {
    fn from(app: &ApplicationConfig) -> Self {
        Self {
            asset_base_path: app.asset_base_path.clone(),
            max_loader_count: app.limits.max_loader_count,
        }
    }
}

/// Shader system configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderSystemConfig {
    /// Maximum number of shaders held at once
    pub max_shader_count: u32,
    /// Maximum uniforms per shader
    pub max_uniform_count: u32,
    /// Maximum global-scope textures per shader
    pub max_global_textures: u32,
    /// Maximum instance-scope textures per shader
    pub max_instance_textures: u32,
}

impl From<&ApplicationConfig> for ShaderSystemConfig {
    fn from(app: &ApplicationConfig) -> Self {
        Self {
            max_shader_count: app.limits.max_shader_count,
            max_uniform_count: app.limits.max_uniform_count,
            max_global_textures: app.limits.max_global_textures,
            max_instance_textures: app.limits.max_instance_textures,
        }
    }
}

/// Renderer frontend configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    /// Application name reported to the graphics API
    pub application_name: String,
}

impl From<&ApplicationConfig> for RendererConfig {
    fn from(app: &ApplicationConfig) -> Self {
        Self {
            application_name: app.name.clone(),
        }
    }
}

/// Texture system configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSystemConfig {
    /// Maximum number of textures held at once
    pub max_texture_count: u32,
}

impl From<&ApplicationConfig> for TextureSystemConfig {
    fn from(app: &ApplicationConfig) -> Self {
        Self {
            max_texture_count: app.limits.max_texture_count,
        }
    }
}

/// Camera system configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraSystemConfig {
    /// Maximum number of cameras held at once
    pub max_camera_count: u32,
}

impl From<&ApplicationConfig> for CameraSystemConfig {
    fn from(app: &ApplicationConfig) -> Self {
        Self {
            max_camera_count: app.limits.max_camera_count,
        }
    }
}

/// Render view system configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderViewSystemConfig {
    /// Maximum number of views held at once
    pub max_view_count: u32,
}

impl From<&ApplicationConfig> for RenderViewSystemConfig {
    fn from(app: &ApplicationConfig) -> Self {
        Self {
            max_view_count: app.limits.max_view_count,
        }
    }
}

/// Material system configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialSystemConfig {
    /// Maximum number of materials held at once
    pub max_material_count: u32,
}

impl From<&ApplicationConfig> for MaterialSystemConfig {
    fn from(app: &ApplicationConfig) -> Self {
        Self {
            max_material_count: app.limits.max_material_count,
        }
    }
}

/// Geometry system configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometrySystemConfig {
    /// Maximum number of geometries held at once
    pub max_geometry_count: u32,
}

impl From<&ApplicationConfig> for GeometrySystemConfig {
    fn from(app: &ApplicationConfig) -> Self {
        Self {
            max_geometry_count: app.limits.max_geometry_count,
        }
    }
}

/// A system (vector) font loaded at boot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemFontConfig {
    /// Font name used for lookups
    pub name: String,
    /// Size used when no size is requested
    pub default_size: u16,
    /// Name of the font resource to load
    pub resource_name: String,
}

/// A pre-rasterized bitmap font loaded at boot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitmapFontConfig {
    /// Font name used for lookups
    pub name: String,
    /// Pixel size the bitmap was rendered at
    pub size: u16,
    /// Name of the font resource to load
    pub resource_name: String,
}

/// Font system configuration, supplied by the application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSystemConfig {
    /// System fonts to load at boot
    pub system_fonts: Vec<SystemFontConfig>,
    /// Bitmap fonts to load at boot
    pub bitmap_fonts: Vec<BitmapFontConfig>,
    /// Maximum number of system fonts held at once
    pub max_system_font_count: u8,
    /// Maximum number of bitmap fonts held at once
    pub max_bitmap_font_count: u8,
    /// Release fonts automatically once nothing references them
    pub auto_release: bool,
}

impl Default for FontSystemConfig {
    fn default() -> Self {
        Self {
            system_fonts: Vec::new(),
            bitmap_fonts: Vec::new(),
            max_system_font_count: 101,
            max_bitmap_font_count: 101,
            auto_release: false,
        }
    }
}

/// Kind of render view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderViewType {
    /// Lit world geometry
    World,
    /// Screen-space user interface
    Ui,
    /// Skybox / environment
    Skybox,
    /// Object picking (offscreen id buffer)
    Pick,
}

/// A single render pass within a view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPassConfig {
    /// Pass name, unique within the view
    pub name: String,
    /// Clear color applied when the pass begins
    #[serde(default)]
    pub clear_color: [f32; 4],
}

/// Descriptor for a render view materialized during post-boot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderViewConfig {
    /// View name, unique across the application
    pub name: String,
    /// Kind of view
    pub view_type: RenderViewType,
    /// Width in pixels; zero follows the window
    #[serde(default)]
    pub width: u32,
    /// Height in pixels; zero follows the window
    #[serde(default)]
    pub height: u32,
    /// Shader overriding the view type's default
    #[serde(default)]
    pub custom_shader_name: Option<String>,
    /// Passes rendered by this view, in order
    #[serde(default)]
    pub passes: Vec<RenderPassConfig>,
}

impl RenderViewConfig {
    /// Create a window-sized view with no passes
    pub fn new(name: impl Into<String>, view_type: RenderViewType) -> Self {
        Self {
            name: name.into(),
            view_type,
            width: 0,
            height: 0,
            custom_shader_name: None,
            passes: Vec::new(),
        }
    }

    /// Append a render pass
    pub fn with_pass(mut self, name: impl Into<String>) -> Self {
        self.passes.push(RenderPassConfig {
            name: name.into(),
            clear_color: [0.0; 4],
        });
        self
    }

    /// Override the view's shader
    pub fn with_custom_shader(mut self, shader: impl Into<String>) -> Self {
        self.custom_shader_name = Some(shader.into());
        self
    }
}
