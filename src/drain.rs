/// Waits for work that has already been started to finish.
#[trait_variant::make(Send)]
pub trait Drain: Sync {
    /// Resolves once every emission started before or during the call has
    /// run to completion. New emissions are not blocked.
    async fn drain(&self);
}
