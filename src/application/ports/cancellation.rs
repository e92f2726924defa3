//! Cancellation port interface

/// Port for "has shutdown been requested"
pub trait CancellationToken {
    /// Checked once per frame; must not block
    fn is_cancelled(&self) -> bool;
}

/// Cancelled as soon as either inner token is
#[derive(Debug, Clone)]
pub struct AnyOf<A, B>(pub A, pub B);

impl<A, B> CancellationToken for AnyOf<A, B>
where
    A: CancellationToken,
    B: CancellationToken,
{
    fn is_cancelled(&self) -> bool {
        self.0.is_cancelled() || self.1.is_cancelled()
    }
}

/// Blanket implementation for references
impl<T: CancellationToken + ?Sized> CancellationToken for &T {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// Blanket implementation for boxed tokens
impl CancellationToken for Box<dyn CancellationToken> {
    fn is_cancelled(&self) -> bool {
        self.as_ref().is_cancelled()
    }
}
