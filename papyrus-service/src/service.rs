//! Display actor
//!
//! [`EinkService`] is the single owner of the display backend. Messages are
//! handled strictly in arrival order and each call completes before the
//! next message is looked at. Draw failures are logged and answered like
//! successes; a stuck display actor would stall the whole UI.

use embassy_time::Duration;
use papyrus_core::{
    ColorMode, DisplayBackend, DisplayError, ImageRequest, Message, Outbound, PowerAction,
    PowerMode, PowerOffTimer, RefreshMode, ServiceState, Status, WaveformTemperature,
};
use papyrus_hal::{CpuFrequency, PowerAuthority, SettingKey, SettingsError, SettingsStore};

use crate::sentinel::{FrequencySentinel, SentinelPolicy};

/// What happens to the panel image when the service stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExitPolicy {
    /// Leave the last image on the panel
    #[default]
    KeepImage,
    /// Fill the panel white before shutting down
    WipeOut,
}

/// Display service configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServiceConfig {
    /// Quiet period after the last draw before the panel is powered off
    pub power_off_delay_ms: u32,
    pub sentinel_policy: SentinelPolicy,
    /// Frequency floor held while drawing
    pub frequency_floor: CpuFrequency,
    pub exit_policy: ExitPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            power_off_delay_ms: 2000,
            sentinel_policy: SentinelPolicy::Always,
            frequency_floor: CpuFrequency::Level6,
            exit_policy: ExitPolicy::KeepImage,
        }
    }
}

impl ServiceConfig {
    pub fn power_off_delay(&self) -> Duration {
        Duration::from_millis(self.power_off_delay_ms as u64)
    }
}

/// Startup failure; the supervisor must not register the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartError {
    /// The panel could not be reset and initialised
    Init(DisplayError),
}

impl From<DisplayError> for StartError {
    fn from(e: DisplayError) -> Self {
        StartError::Init(e)
    }
}

/// The display actor
pub struct EinkService<D, S, A> {
    display: D,
    settings: S,
    sentinel: FrequencySentinel<A>,
    state: ServiceState,
    power_off: PowerOffTimer,
    /// A draw ran in the last `handle`; the quiet period restarts on `settle`
    drew: bool,
    config: ServiceConfig,
}

impl<D, S, A> EinkService<D, S, A>
where
    D: DisplayBackend,
    S: SettingsStore,
    A: PowerAuthority,
{
    pub fn new(display: D, settings: S, authority: A, config: ServiceConfig) -> Self {
        Self {
            display,
            settings,
            sentinel: FrequencySentinel::new(
                authority,
                config.sentinel_policy,
                config.frequency_floor,
            ),
            state: ServiceState::Running,
            power_off: PowerOffTimer::new(config.power_off_delay_ms as u64),
            drew: false,
            config,
        }
    }

    /// Bring the panel up
    ///
    /// Only a failed panel reset is fatal. On success the colour mode is
    /// restored, the device and sentinel are registered, and the panel is
    /// powered with the frequency floor held for the first draw.
    pub async fn start(&mut self, now_ms: u64) -> Result<(), StartError> {
        if let Err(e) = self.display.reset_and_init().await {
            error!("display init failed: {:?}", e);
            return Err(StartError::Init(e));
        }

        let mode = self.restore_color_mode().await;
        self.display.set_mode(mode);

        self.sentinel.register(self.display.device());

        if let Err(e) = self.display.power_on().await {
            warn!("display power on failed: {:?}", e);
        }
        self.sentinel.hold_minimum_frequency();
        self.power_off.arm(now_ms);
        self.state = ServiceState::Running;

        info!("display service started, mode {:?}", mode);
        Ok(())
    }

    /// Handle one inbound message, returning the reply if there is one
    pub async fn handle(&mut self, message: Message<'_>, now_ms: u64) -> Option<Outbound> {
        match message {
            Message::ColorModeChange(mode) => Some(self.change_color_mode(mode).await),
            Message::Image(request) => self.show(request, now_ms).await,
            Message::PrepareEarly(mode) => {
                self.prepare_early(mode, now_ms).await;
                None
            }
            Message::PowerModeChanged(mode) => {
                self.power_mode_changed(mode).await;
                None
            }
            Message::LockChanged { locked } => {
                debug!("lock changed: {}", locked);
                self.sentinel.set_locked(locked);
                None
            }
        }
    }

    /// Restart the quiet period once the last handled message has finished
    ///
    /// `now_ms` must be sampled after `handle` returns. A slow draw then
    /// still gets the full delay before the panel powers off.
    pub fn settle(&mut self, now_ms: u64) {
        if core::mem::take(&mut self.drew) && self.power_off.is_armed() {
            self.power_off.arm(now_ms);
        }
    }

    /// Deadline of the pending power-off, in milliseconds
    pub fn power_off_deadline(&self) -> Option<u64> {
        self.power_off.deadline()
    }

    /// Run the debounced power-off if it is due
    pub async fn on_power_off_timer(&mut self, now_ms: u64) {
        if !self.power_off.take_expired(now_ms) {
            return;
        }
        debug!("quiet period over, powering panel off");
        if let Err(e) = self.display.power_off().await {
            warn!("display power off failed: {:?}", e);
        }
        self.sentinel.release_minimum_frequency();
    }

    /// Terminal shutdown
    pub async fn stop(&mut self) {
        self.power_off.cancel();
        self.drew = false;
        if self.config.exit_policy == ExitPolicy::WipeOut {
            if let Err(e) = self.display.wipe_out().await {
                warn!("display wipe out failed: {:?}", e);
            }
        }
        if let Err(e) = self.display.shutdown().await {
            warn!("display shutdown failed: {:?}", e);
        }
        self.sentinel.release_minimum_frequency();
        self.state = ServiceState::Suspended;
        info!("display service stopped");
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    /// Colour mode currently applied to the panel
    pub fn color_mode(&self) -> ColorMode {
        self.display.mode()
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    pub fn sentinel(&self) -> &FrequencySentinel<A> {
        &self.sentinel
    }

    pub fn into_parts(self) -> (D, S, A) {
        (self.display, self.settings, self.sentinel.into_inner())
    }

    async fn restore_color_mode(&mut self) -> ColorMode {
        match self.settings.get(SettingKey::DisplayInvertedMode).await {
            Ok(value) => ColorMode::from_setting(&value).unwrap_or_else(|| {
                warn!("invalid stored colour mode, using standard");
                ColorMode::Standard
            }),
            Err(SettingsError::NotFound) => {
                debug!("no stored colour mode");
                ColorMode::Standard
            }
            Err(e) => {
                warn!("colour mode read failed: {:?}", e);
                ColorMode::Standard
            }
        }
    }

    async fn change_color_mode(&mut self, mode: ColorMode) -> Outbound {
        if self.display.mode() != mode {
            self.display.set_mode(mode);
            if let Err(e) = self
                .settings
                .set(SettingKey::DisplayInvertedMode, mode.as_setting())
                .await
            {
                warn!("colour mode write failed: {:?}", e);
            }
            debug!("colour mode {:?}", mode);
        }
        Outbound::ColorModeChanged(mode)
    }

    async fn show(&mut self, request: ImageRequest<'_>, now_ms: u64) -> Option<Outbound> {
        if !self.state.accepts_draw() {
            debug!("suspended, dropping image {}", request.id);
            return None;
        }

        self.power_off.arm(now_ms);
        self.drew = true;
        self.sentinel.hold_minimum_frequency();

        match request.refresh_frame() {
            Some(refresh_frame) => {
                let status: Status = self
                    .display
                    .show_image(&request.frames, refresh_frame, request.buffer, request.mode)
                    .await
                    .into();
                if status.is_ok() {
                    trace!("image {} displayed", request.id);
                } else {
                    error!("image {} failed: {:?}", request.id, status);
                }
            }
            None => warn!("image {} has no frames", request.id),
        }

        Some(Outbound::ImageDisplayed { id: request.id })
    }

    async fn prepare_early(&mut self, mode: RefreshMode, now_ms: u64) {
        if !self.state.accepts_draw() {
            return;
        }
        // Preparing powers the panel, so the quiet-period power-off applies
        self.power_off.arm(now_ms);
        self.drew = true;
        self.display
            .prepare_early_request(mode, WaveformTemperature::Measure)
            .await;
    }

    async fn power_mode_changed(&mut self, mode: PowerMode) {
        let previous = self.state;
        let (next, action) = previous.transition(mode);
        info!("power mode {:?}: {:?} -> {:?}", mode, previous, next);

        match action {
            PowerAction::ResetAndInit => {
                if let Err(e) = self.display.reset_and_init().await {
                    error!("display reinit failed: {:?}", e);
                }
                if previous == ServiceState::Running {
                    self.recover_power_cycle().await;
                }
            }
            PowerAction::Shutdown => {
                self.power_off.cancel();
                self.sentinel.release_minimum_frequency();
                if let Err(e) = self.display.shutdown().await {
                    warn!("display shutdown failed: {:?}", e);
                }
            }
        }
        self.state = next;
    }

    /// Cycle panel power under a brief frequency floor
    async fn recover_power_cycle(&mut self) {
        self.power_off.cancel();
        self.sentinel.hold_minimum_frequency();
        if let Err(e) = self.display.power_on().await {
            warn!("display power on failed: {:?}", e);
        }
        if let Err(e) = self.display.power_off().await {
            warn!("display power off failed: {:?}", e);
        }
        self.sentinel.release_minimum_frequency();
    }
}
