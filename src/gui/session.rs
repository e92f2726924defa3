//! Compositor session: connection, registry round-trip and capability binding

use smithay_client_toolkit::{
    compositor::CompositorState, registry::RegistryState, shell::wlr_layer::LayerShell, shm::Shm,
};
use tracing::{debug, info};
use wayland_client::{
    globals::{registry_queue_init, GlobalList},
    Connection, EventQueue, QueueHandle,
};

use crate::domain::{Capability, OverlayError};

use super::layer_shell::OverlayState;

/// Typed handles for every global the overlay needs, resolved once at startup
pub struct Capabilities {
    pub registry: RegistryState,
    pub compositor: CompositorState,
    pub shm: Shm,
    pub layer_shell: LayerShell,
}

/// Live connection plus the advertised globals
pub struct CompositorSession {
    pub connection: Connection,
    pub globals: GlobalList,
    pub event_queue: EventQueue<OverlayState>,
}

impl CompositorSession {
    /// Connect using `WAYLAND_DISPLAY`/`WAYLAND_SOCKET` and block until the
    /// compositor has listed its globals
    pub fn connect() -> Result<Self, OverlayError> {
        let connection = Connection::connect_to_env()
            .map_err(|e| OverlayError::ConnectionFailed(e.to_string()))?;
        Self::from_connection(connection)
    }

    /// Run the registry round-trip on an already established connection
    pub fn from_connection(connection: Connection) -> Result<Self, OverlayError> {
        let (globals, event_queue) = registry_queue_init::<OverlayState>(&connection)
            .map_err(|e| OverlayError::ConnectionFailed(e.to_string()))?;

        info!("Connected to Wayland compositor");

        Ok(Self {
            connection,
            globals,
            event_queue,
        })
    }

    /// Interface names the compositor advertised during the round-trip
    pub fn advertised(&self) -> Vec<String> {
        self.globals.contents().with_list(|list| {
            list.iter()
                .map(|global| global.interface.clone())
                .collect::<Vec<_>>()
        })
    }

    /// Bind the surface factory, shm factory and layer-shell extension.
    ///
    /// Fails with the first required capability that is absent or cannot be
    /// bound at a supported version.
    pub fn bind(&self, qh: &QueueHandle<OverlayState>) -> Result<Capabilities, OverlayError> {
        let advertised = self.advertised();
        for interface in &advertised {
            debug!(interface = %interface, "Advertised global");
        }

        if let Some(missing) = Capability::missing_from(advertised.iter().map(String::as_str))
            .into_iter()
            .next()
        {
            return Err(OverlayError::MissingCapability(missing));
        }

        let compositor = CompositorState::bind(&self.globals, qh)
            .map_err(|_| OverlayError::MissingCapability(Capability::Compositor))?;
        let shm = Shm::bind(&self.globals, qh)
            .map_err(|_| OverlayError::MissingCapability(Capability::Shm))?;
        let layer_shell = LayerShell::bind(&self.globals, qh)
            .map_err(|_| OverlayError::MissingCapability(Capability::LayerShell))?;

        Ok(Capabilities {
            registry: RegistryState::new(&self.globals),
            compositor,
            shm,
            layer_shell,
        })
    }
}
