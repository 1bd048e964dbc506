/// Bookkeeping for a host-driven, self-rescheduling frame callback
///
/// `H` is whatever the host uses to identify a pending frame: a
/// `requestAnimationFrame` id in the browser, a deadline in the terminal.
#[derive(Debug)]
pub struct FrameLoop<H> {
    pending: Option<H>,
    cancelled: bool,
    frames: u64,
}

impl<H> FrameLoop<H> {
    pub fn new() -> Self {
        Self {
            pending: None,
            cancelled: false,
            frames: 0,
        }
    }

    /// Request the next frame unless the loop was cancelled
    pub fn schedule<F>(&mut self, request: F) -> bool
    where
        F: FnOnce() -> H,
    {
        if self.cancelled {
            return false;
        }
        self.pending = Some(request());
        true
    }

    /// Like [`FrameLoop::schedule`] for hosts whose request can fail
    pub fn try_schedule<F, E>(&mut self, request: F) -> Result<bool, E>
    where
        F: FnOnce() -> Result<H, E>,
    {
        if self.cancelled {
            return Ok(false);
        }
        self.pending = Some(request()?);
        Ok(true)
    }

    /// Called when a scheduled frame fires; returns whether it should be drawn
    pub fn begin_frame(&mut self) -> bool {
        self.pending = None;
        if self.cancelled {
            return false;
        }
        self.frames += 1;
        true
    }

    /// Stop the loop, handing back the pending handle so the host can release it
    pub fn cancel(&mut self) -> Option<H> {
        self.cancelled = true;
        self.pending.take()
    }

    pub fn pending(&self) -> Option<&H> {
        self.pending.as_ref()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Number of frames drawn so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl<H> Default for FrameLoop<H> {
    fn default() -> Self {
        Self::new()
    }
}
