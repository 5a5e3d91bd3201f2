use super::backend::HwdecBackend;
use super::context::{DecoderContext, HwdecInfo};
use hwdec_types::{HwdecError, ImageFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendState {
    Unprobed,
    ProbedOk,
    /// Terminal: the host discards the backend for this stream.
    ProbedFail,
    Initialized,
    /// Also kept after a failed reconfigure; the session is then unusable.
    Configured,
    TornDown,
}

/// One decoder instance driving one backend through its lifecycle.
///
/// Out-of-order calls are rejected with `InvalidState`. If the instance is
/// dropped after `init` without an explicit `uninit`, teardown runs on drop.
pub struct ActiveHwdec<'a> {
    backend: &'a dyn HwdecBackend,
    ctx: DecoderContext,
    state: BackendState,
}

impl<'a> ActiveHwdec<'a> {
    pub fn new(backend: &'a dyn HwdecBackend, ctx: DecoderContext) -> Self {
        Self {
            backend,
            ctx,
            state: BackendState::Unprobed,
        }
    }

    pub fn state(&self) -> BackendState {
        self.state
    }

    pub fn context(&self) -> &DecoderContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut DecoderContext {
        &mut self.ctx
    }

    fn expect_state(&self, op: &str, allowed: &[BackendState]) -> Result<(), HwdecError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(HwdecError::invalid_state(format!(
                "{} called in state {:?}",
                op, self.state
            )))
        }
    }

    pub fn probe(&mut self, info: Option<&mut HwdecInfo>, decoder: &str) -> Result<(), HwdecError> {
        self.expect_state("probe", &[BackendState::Unprobed])?;
        match self.backend.probe(info, decoder) {
            Ok(()) => {
                self.state = BackendState::ProbedOk;
                Ok(())
            }
            Err(e) => {
                self.state = BackendState::ProbedFail;
                Err(e)
            }
        }
    }

    pub fn init(&mut self) -> Result<(), HwdecError> {
        self.expect_state("init", &[BackendState::ProbedOk])?;
        self.backend.init(&mut self.ctx)?;
        self.state = BackendState::Initialized;
        Ok(())
    }

    pub fn init_decoder(
        &mut self,
        format: ImageFormat,
        width: u32,
        height: u32,
    ) -> Result<(), HwdecError> {
        self.expect_state(
            "init_decoder",
            &[BackendState::Initialized, BackendState::Configured],
        )?;
        if let Some(codec) = self.ctx.codec.as_mut() {
            codec.width = width;
            codec.height = height;
        }
        let result = self.backend.init_decoder(&mut self.ctx, format, width, height);
        self.state = BackendState::Configured;
        result
    }

    /// Tears the backend down. Repeating it is a no-op for the backend.
    pub fn uninit(&mut self) {
        if self.state == BackendState::ProbedFail {
            return;
        }
        self.backend.uninit(&mut self.ctx);
        self.state = BackendState::TornDown;
    }
}

impl Drop for ActiveHwdec<'_> {
    fn drop(&mut self) {
        if matches!(
            self.state,
            BackendState::Initialized | BackendState::Configured
        ) {
            log::debug!(
                "tearing down {} backend on drop",
                self.backend.descriptor().api_name()
            );
            self.uninit();
        }
    }
}
