//! Compositor capabilities the overlay cannot run without

use std::fmt;

/// A required Wayland global, keyed by its stable interface name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Surface factory
    Compositor,
    /// Shared-memory buffer factory
    Shm,
    /// Overlay-layer surface extension
    LayerShell,
}

impl Capability {
    /// All required capabilities, in bind order
    pub const REQUIRED: [Capability; 3] = [Self::Compositor, Self::Shm, Self::LayerShell];

    /// Interface name advertised by the registry
    pub const fn interface(&self) -> &'static str {
        match self {
            Self::Compositor => "wl_compositor",
            Self::Shm => "wl_shm",
            Self::LayerShell => "zwlr_layer_shell_v1",
        }
    }

    /// Required capabilities absent from an advertised interface list.
    ///
    /// Interfaces the overlay does not know about are skipped.
    pub fn missing_from<'a, I>(advertised: I) -> Vec<Capability>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut found = [false; 3];
        for interface in advertised {
            if let Some(idx) = Self::REQUIRED
                .iter()
                .position(|cap| cap.interface() == interface)
            {
                found[idx] = true;
            }
        }

        Self::REQUIRED
            .iter()
            .zip(found)
            .filter(|(_, present)| !present)
            .map(|(cap, _)| *cap)
            .collect()
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.interface())
    }
}
