//! Wayland layer-shell border overlay
//!
//! Uses smithay-client-toolkit to create a layer-shell surface that:
//! - Renders on the overlay layer (always on top)
//! - Sits at a fixed position around the recorded region
//! - Has an empty input region (fully click-through)
//! - Ignores other surfaces' exclusive zones

use smithay_client_toolkit::{
    compositor::{CompositorHandler, CompositorState, Region},
    delegate_compositor, delegate_layer, delegate_registry, delegate_shm,
    registry::{ProvidesRegistryState, RegistryState},
    registry_handlers,
    shell::{
        wlr_layer::{
            Anchor, KeyboardInteractivity, Layer, LayerShell, LayerShellHandler, LayerSurface,
            LayerSurfaceConfigure,
        },
        WaylandSurface,
    },
    shm::{Shm, ShmHandler},
};
use tracing::{debug, info, warn};
use wayland_client::{
    protocol::{wl_buffer, wl_output, wl_shm_pool, wl_surface},
    Connection, Dispatch, EventQueue, QueueHandle,
};

use crate::application::ports::OverlayBackend;
use crate::domain::config::SURFACE_NAMESPACE;
use crate::domain::{
    draw_border, BorderColor, BorderedRect, Capability, NegotiationState, OverlayError,
};

use super::session::{Capabilities, CompositorSession};
use super::shm::SharedPixelBuffer;

/// Exclusive zone value that ignores every other surface's exclusive zone
const IGNORE_EXCLUSIVE_ZONES: i32 = -1;

/// Dispatch target for all overlay protocol objects
pub struct OverlayState {
    extent: BorderedRect,
    negotiation: NegotiationState,

    // Fields drop in declaration order, which is the release order:
    // buffer, layer surface, layer shell, shm, compositor, registry.
    buffer: Option<SharedPixelBuffer>,
    layer_surface: Option<LayerSurface>,
    layer_shell: LayerShell,
    shm: Shm,
    compositor_state: CompositorState,
    registry_state: RegistryState,
}

impl OverlayState {
    fn new(extent: BorderedRect, caps: Capabilities) -> Self {
        Self {
            extent,
            negotiation: NegotiationState::Created,
            buffer: None,
            layer_surface: None,
            layer_shell: caps.layer_shell,
            shm: caps.shm,
            compositor_state: caps.compositor,
            registry_state: caps.registry,
        }
    }

    /// Create the surface, request its overlay role and commit the initial
    /// state so the compositor answers with a configure.
    fn request_surface(&mut self, qh: &QueueHandle<Self>) {
        if self.layer_surface.is_some() {
            return;
        }

        let surface = self.compositor_state.create_surface(qh);

        let layer_surface = self.layer_shell.create_layer_surface(
            qh,
            surface,
            Layer::Overlay,
            Some(SURFACE_NAMESPACE),
            None, // Let the compositor pick the output
        );

        layer_surface.set_anchor(Anchor::TOP | Anchor::LEFT);
        layer_surface.set_exclusive_zone(IGNORE_EXCLUSIVE_ZONES);
        layer_surface.set_keyboard_interactivity(KeyboardInteractivity::None);
        layer_surface.set_margin(self.extent.margin_top(), 0, 0, self.extent.margin_left());
        layer_surface.set_size(self.extent.width() as u32, self.extent.height() as u32);

        // Commit to apply configuration
        layer_surface.commit();

        self.negotiation.request();
        self.layer_surface = Some(layer_surface);

        info!(
            top = self.extent.margin_top(),
            left = self.extent.margin_left(),
            width = self.extent.width(),
            height = self.extent.height(),
            "Requested overlay layer surface"
        );
    }

    /// Release protocol objects in dependency order. Safe to call repeatedly;
    /// anything never acquired is skipped.
    fn teardown(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            drop(buffer);
        }
        if let Some(layer_surface) = self.layer_surface.take() {
            drop(layer_surface);
            debug!("Destroyed layer surface");
        }
    }
}

/// A connected overlay: protocol state plus the queue that feeds it
pub struct OverlayDriver {
    // Dropped before the queue and the connection
    state: OverlayState,
    qh: QueueHandle<OverlayState>,
    event_queue: EventQueue<OverlayState>,
    connection: Connection,
}

impl OverlayDriver {
    /// Connect through the environment, bind the required globals and
    /// request the overlay surface
    pub fn connect(extent: BorderedRect) -> Result<Self, OverlayError> {
        Self::start(CompositorSession::connect()?, extent)
    }

    /// Same as [`OverlayDriver::connect`], over an already established
    /// connection
    pub fn from_connection(
        connection: Connection,
        extent: BorderedRect,
    ) -> Result<Self, OverlayError> {
        Self::start(CompositorSession::from_connection(connection)?, extent)
    }

    fn start(session: CompositorSession, extent: BorderedRect) -> Result<Self, OverlayError> {
        let qh = session.event_queue.handle();
        let caps = session.bind(&qh)?;

        let CompositorSession {
            connection,
            event_queue,
            ..
        } = session;

        let mut state = OverlayState::new(extent, caps);
        state.request_surface(&qh);

        Ok(Self {
            state,
            qh,
            event_queue,
            connection,
        })
    }
}

impl OverlayBackend for OverlayDriver {
    fn negotiation(&self) -> NegotiationState {
        self.state.negotiation
    }

    fn dispatch_blocking(&mut self) -> Result<(), OverlayError> {
        self.event_queue
            .blocking_dispatch(&mut self.state)
            .map(|_| ())
            .map_err(|e| OverlayError::ConnectionLost(e.to_string()))
    }

    fn clear_input_region(&mut self) -> Result<(), OverlayError> {
        let Some(layer_surface) = self.state.layer_surface.as_ref() else {
            return Ok(());
        };

        // A region with no rectangles added accepts no input at all
        let empty = Region::new(&self.state.compositor_state)
            .map_err(|_| OverlayError::MissingCapability(Capability::Compositor))?;
        layer_surface.wl_surface().set_input_region(Some(empty.wl_region()));
        drop(empty);
        layer_surface.commit();

        debug!("Installed empty input region");
        Ok(())
    }

    fn allocate_buffer(&mut self) -> Result<(), OverlayError> {
        if self.state.buffer.is_some() {
            return Ok(());
        }

        let buffer = SharedPixelBuffer::allocate(self.state.shm.wl_shm(), self.state.extent, &self.qh)?;
        info!(bytes = buffer.len(), "Shared pixel buffer ready");
        self.state.buffer = Some(buffer);
        Ok(())
    }

    fn submit_frame(&mut self, color: BorderColor) -> Result<(), OverlayError> {
        let border = self.state.extent.border();
        let (width, height) = (self.state.extent.width(), self.state.extent.height());

        let (Some(layer_surface), Some(buffer)) =
            (self.state.layer_surface.as_ref(), self.state.buffer.as_mut())
        else {
            return Err(OverlayError::AllocationFailed(
                "frame submitted before the surface and pixel buffer were ready".into(),
            ));
        };

        let mut canvas = buffer.canvas()?;
        draw_border(&mut canvas, color, border);

        let surface = layer_surface.wl_surface();
        surface.attach(Some(buffer.wl_buffer()), 0, 0);
        surface.damage(0, 0, width, height);
        surface.commit();

        Ok(())
    }

    fn dispatch_pending(&mut self) -> Result<(), OverlayError> {
        self.event_queue
            .dispatch_pending(&mut self.state)
            .map(|_| ())
            .map_err(|e| OverlayError::ConnectionLost(e.to_string()))
    }

    fn flush(&mut self) -> Result<(), OverlayError> {
        self.event_queue
            .flush()
            .map_err(|e| OverlayError::ConnectionLost(e.to_string()))
    }
}

impl Drop for OverlayDriver {
    fn drop(&mut self) {
        self.state.teardown();
        // Push the destroy requests out before the connection closes
        if let Err(e) = self.connection.flush() {
            warn!("Failed to flush teardown requests: {}", e);
        }
    }
}

// SCTK delegate implementations

impl CompositorHandler for OverlayState {
    fn scale_factor_changed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _new_factor: i32,
    ) {
    }

    fn transform_changed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _new_transform: wl_output::Transform,
    ) {
    }

    fn frame(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _time: u32,
    ) {
    }

    fn surface_enter(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _output: &wl_output::WlOutput,
    ) {
    }

    fn surface_leave(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _output: &wl_output::WlOutput,
    ) {
    }
}

impl LayerShellHandler for OverlayState {
    fn closed(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _layer: &LayerSurface) {
        info!(previous = %self.negotiation, "Compositor closed the overlay surface");
        self.negotiation.close();
    }

    fn configure(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _layer: &LayerSurface,
        configure: LayerSurfaceConfigure,
        serial: u32,
    ) {
        // SCTK has already sent ack_configure for this serial; acking it
        // again would be a protocol error
        if self.negotiation.configure(serial) {
            debug!(
                serial,
                width = configure.new_size.0,
                height = configure.new_size.1,
                "Overlay surface configured"
            );
        }
    }
}

impl ShmHandler for OverlayState {
    fn shm_state(&mut self) -> &mut Shm {
        &mut self.shm
    }
}

impl ProvidesRegistryState for OverlayState {
    fn registry(&mut self) -> &mut RegistryState {
        &mut self.registry_state
    }

    registry_handlers!();
}

// Protocol objects created directly rather than through SCTK helpers

impl Dispatch<wl_shm_pool::WlShmPool, ()> for OverlayState {
    fn event(
        _state: &mut Self,
        _proxy: &wl_shm_pool::WlShmPool,
        _event: wl_shm_pool::Event,
        _data: &(),
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
    }
}

impl Dispatch<wl_buffer::WlBuffer, ()> for OverlayState {
    fn event(
        _state: &mut Self,
        _proxy: &wl_buffer::WlBuffer,
        _event: wl_buffer::Event,
        _data: &(),
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        // Release is ignored: the same buffer is rewritten every frame
    }
}

delegate_compositor!(OverlayState);
delegate_shm!(OverlayState);
delegate_layer!(OverlayState);
delegate_registry!(OverlayState);
