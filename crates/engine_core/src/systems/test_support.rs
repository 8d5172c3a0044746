//! Recording mock subsystems for unit tests

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use super::catalog::SystemCatalog;
use super::config::{
    CameraSystemConfig, FontSystemConfig, GeometrySystemConfig, MaterialSystemConfig, PlatformConfig, RenderViewConfig,
    RenderViewSystemConfig, RendererConfig, ResourceConfig, ShaderSystemConfig, TextureSystemConfig,
};
use super::jobs::JobSystemConfig;
use super::{InitializeSystem, PlatformSystem, RenderViewSystem, RendererSystem, Subsystem, SystemError, SystemType};

/// A lifecycle call observed by the journal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SizeQuery(SystemType),
    /// System type and length of the block it received
    Initialize(SystemType, usize),
    Update(SystemType),
    /// System type and length of the block it received
    Shutdown(SystemType, usize),
    CreateView(String),
}

/// Shared, ordered log of lifecycle calls
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Call>>>);

impl Journal {
    pub fn record(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.0.borrow().iter().filter(|call| predicate(call)).count()
    }

    /// System types in the order their initialize step ran
    pub fn initialized(&self) -> Vec<SystemType> {
        self.0
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Initialize(ty, _) => Some(*ty),
                _ => None,
            })
            .collect()
    }

    /// System types in the order they were shut down
    pub fn shut_down(&self) -> Vec<SystemType> {
        self.0
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Shutdown(ty, _) => Some(*ty),
                _ => None,
            })
            .collect()
    }
}

/// Subsystem double that records every call and can be told to fail
pub struct MockSystem<C> {
    ty: SystemType,
    journal: Journal,
    size: usize,
    fail_size_query: bool,
    fail_initialize: bool,
    updates: bool,
    fail_update: bool,
    processor_count: usize,
    multithreaded: bool,
    failing_view: Option<String>,
    received: Option<C>,
    _config: PhantomData<fn() -> C>,
}

impl<C> MockSystem<C> {
    pub fn new(ty: SystemType, journal: Journal) -> Self {
        Self {
            ty,
            journal,
            size: 64,
            fail_size_query: false,
            fail_initialize: false,
            updates: false,
            fail_update: false,
            processor_count: 4,
            multithreaded: true,
            failing_view: None,
            received: None,
            _config: PhantomData,
        }
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn failing_size_query(mut self) -> Self {
        self.fail_size_query = true;
        self
    }

    pub fn failing_initialize(mut self) -> Self {
        self.fail_initialize = true;
        self
    }

    pub fn updating(mut self) -> Self {
        self.updates = true;
        self
    }

    pub fn failing_update(mut self) -> Self {
        self.fail_update = true;
        self
    }

    /// Config passed to the initialize step
    pub fn received_config(&self) -> Option<&C> {
        self.received.as_ref()
    }
}

impl<C: 'static> Subsystem for MockSystem<C> {
    fn shutdown(&mut self, state: &mut [u8]) {
        self.journal.record(Call::Shutdown(self.ty, state.len()));
    }

    fn wants_update(&self) -> bool {
        self.updates
    }

    fn update(&mut self, _state: &mut [u8], _delta_time: f32) -> Result<(), SystemError> {
        self.journal.record(Call::Update(self.ty));
        if self.fail_update {
            return Err(SystemError::subsystem("update refused"));
        }
        Ok(())
    }
}

impl<C: Clone + 'static> InitializeSystem for MockSystem<C> {
    type Config = C;

    fn required_size(&self, _config: &C) -> Result<usize, SystemError> {
        self.journal.record(Call::SizeQuery(self.ty));
        if self.fail_size_query {
            return Err(SystemError::subsystem("size query refused"));
        }
        Ok(self.size)
    }

    fn initialize(&mut self, state: &mut [u8], config: &C) -> Result<(), SystemError> {
        self.journal.record(Call::Initialize(self.ty, state.len()));
        if self.fail_initialize {
            return Err(SystemError::subsystem("initialize refused"));
        }
        // Stamp the block so tests can tell blocks apart
        state.fill(self.ty.index() as u8 + 1);
        self.received = Some(config.clone());
        Ok(())
    }
}

impl PlatformSystem for MockSystem<PlatformConfig> {
    fn processor_count(&self) -> usize {
        self.processor_count
    }
}

impl RendererSystem for MockSystem<RendererConfig> {
    fn is_multithreaded(&self) -> bool {
        self.multithreaded
    }
}

impl RenderViewSystem for MockSystem<RenderViewSystemConfig> {
    fn create_view(&mut self, _state: &mut [u8], view: &RenderViewConfig) -> Result<(), SystemError> {
        self.journal.record(Call::CreateView(view.name.clone()));
        if self.failing_view.as_deref() == Some(view.name.as_str()) {
            return Err(SystemError::subsystem(format!("no pass layout for '{}'", view.name)));
        }
        Ok(())
    }
}

/// Catalog handing out [`MockSystem`]s that share one journal
pub struct MockCatalog {
    pub journal: Journal,
    pub size: usize,
    pub processor_count: usize,
    pub multithreaded: bool,
    pub fail_size_query: Option<SystemType>,
    pub fail_initialize: Option<SystemType>,
    pub updating: Vec<SystemType>,
    pub failing_update: Vec<SystemType>,
    pub failing_view: Option<String>,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self {
            journal: Journal::default(),
            size: 64,
            processor_count: 8,
            multithreaded: true,
            fail_size_query: None,
            fail_initialize: None,
            updating: Vec::new(),
            failing_update: Vec::new(),
            failing_view: None,
        }
    }
}

impl MockCatalog {
    fn make<C>(&self, ty: SystemType) -> MockSystem<C> {
        let mut system = MockSystem::new(ty, self.journal.clone()).with_size(self.size);
        system.fail_size_query = self.fail_size_query == Some(ty);
        system.fail_initialize = self.fail_initialize == Some(ty);
        system.updates = self.updating.contains(&ty);
        system.fail_update = self.failing_update.contains(&ty);
        system.processor_count = self.processor_count;
        system.multithreaded = self.multithreaded;
        system.failing_view = self.failing_view.clone();
        system
    }
}

impl SystemCatalog for MockCatalog {
    type Memory = MockSystem<()>;
    type Console = MockSystem<()>;
    type Variables = MockSystem<()>;
    type Events = MockSystem<()>;
    type Logging = MockSystem<()>;
    type Input = MockSystem<()>;
    type Platform = MockSystem<PlatformConfig>;
    type Resource = MockSystem<ResourceConfig>;
    type Shader = MockSystem<ShaderSystemConfig>;
    type Renderer = MockSystem<RendererConfig>;
    type Job = MockSystem<JobSystemConfig>;
    type Texture = MockSystem<TextureSystemConfig>;
    type Font = MockSystem<FontSystemConfig>;
    type Camera = MockSystem<CameraSystemConfig>;
    type RenderView = MockSystem<RenderViewSystemConfig>;
    type Material = MockSystem<MaterialSystemConfig>;
    type Geometry = MockSystem<GeometrySystemConfig>;

    fn memory(&mut self) -> Self::Memory {
        self.make(SystemType::Memory)
    }

    fn console(&mut self) -> Self::Console {
        self.make(SystemType::Console)
    }

    fn variables(&mut self) -> Self::Variables {
        self.make(SystemType::Variables)
    }

    fn events(&mut self) -> Self::Events {
        self.make(SystemType::Events)
    }

    fn logging(&mut self) -> Self::Logging {
        self.make(SystemType::Logging)
    }

    fn input(&mut self) -> Self::Input {
        self.make(SystemType::Input)
    }

    fn platform(&mut self) -> Self::Platform {
        self.make(SystemType::Platform)
    }

    fn resource(&mut self) -> Self::Resource {
        self.make(SystemType::Resource)
    }

    fn shader(&mut self) -> Self::Shader {
        self.make(SystemType::Shader)
    }

    fn renderer(&mut self) -> Self::Renderer {
        self.make(SystemType::Renderer)
    }

    fn job(&mut self) -> Self::Job {
        self.make(SystemType::Job)
    }

    fn texture(&mut self) -> Self::Texture {
        self.make(SystemType::Texture)
    }

    fn font(&mut self) -> Self::Font {
        self.make(SystemType::Font)
    }

    fn camera(&mut self) -> Self::Camera {
        self.make(SystemType::Camera)
    }

    fn render_view(&mut self) -> Self::RenderView {
        self.make(SystemType::RenderView)
    }

    fn material(&mut self) -> Self::Material {
        self.make(SystemType::Material)
    }

    fn geometry(&mut self) -> Self::Geometry {
        self.make(SystemType::Geometry)
    }
}
