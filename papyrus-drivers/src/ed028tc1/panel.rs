//! ED028TC1 panel backend
//!
//! Drives the controller through a [`PanelTransport`]. Waveform tables are
//! read from a [`WaveformSource`] into the scratch buffer and uploaded
//! whenever the selection rules ask for a new one.
//!
//! Any transport failure or busy timeout marks the panel faulted. The next
//! `show_image` resets and re-initialises it before drawing.

use embassy_time::{Instant, Timer};
use papyrus_core::waveform::{lutd_length, Waveform, WaveformState, LUTC_SIZE, LUTD_SIZE};
use papyrus_core::{
    ColorMode, DisplayBackend, DisplayError, Frame, PanelSize, RefreshMode, WaveformTemperature,
};
use papyrus_hal::{DeviceDescriptor, WaveformSource};

use super::commands::{self, Timings};
use super::pack::{pack_4bpp, packed_len};
use crate::config::PanelConfig;
use crate::transport::{ChipSelect, PanelTransport};

/// Name registered with the power manager
pub const DEVICE_NAME: &str = "EInk";

/// ED028TC1 e-paper panel
pub struct Ed028tc1<'a, T, W> {
    transport: T,
    waveforms: W,
    config: PanelConfig,
    scratch: &'a mut [u8],
    mode: ColorMode,
    powered: bool,
    faulted: bool,
    waveform: WaveformState,
}

impl<'a, T, W> Ed028tc1<'a, T, W>
where
    T: PanelTransport,
    W: WaveformSource,
{
    /// Create the backend; call `reset_and_init` before drawing
    ///
    /// `scratch` holds packed frames and waveform tables, see
    /// [`PanelConfig::scratch_len`].
    pub fn new(transport: T, waveforms: W, config: PanelConfig, scratch: &'a mut [u8]) -> Self {
        Self {
            transport,
            waveforms,
            config,
            scratch,
            mode: ColorMode::Standard,
            powered: false,
            faulted: false,
            waveform: WaveformState::default(),
        }
    }

    pub fn is_powered(&self) -> bool {
        self.powered
    }

    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    /// Temperature of the loaded waveform
    pub fn last_temperature(&self) -> i32 {
        self.waveform.temperature
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn track<R>(&mut self, result: Result<R, DisplayError>) -> Result<R, DisplayError> {
        if result.is_err() {
            self.faulted = true;
        }
        result
    }

    /// Write a short command with automatic chip select
    async fn command(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        let result = self.transport.write_block(data, ChipSelect::Automatic).await;
        self.track(result)
    }

    async fn wait_ready(&mut self) -> Result<(), DisplayError> {
        let timeout = self.config.busy_timeout();
        if self.transport.wait_until_not_busy(timeout).await {
            Ok(())
        } else {
            self.faulted = true;
            Err(DisplayError::Timeout)
        }
    }

    /// Write then read within one manual chip-select transaction
    async fn query(&mut self, cmd: u8, wait_busy: bool, out: &mut [u8]) -> Result<(), DisplayError> {
        self.transport.assert_chip_select(true);
        let mut result = self.transport.write_block(&[cmd], ChipSelect::Manual).await;
        if result.is_ok() && wait_busy {
            result = self.wait_ready().await;
        }
        if result.is_ok() {
            result = self.transport.read_block(out, ChipSelect::Manual).await;
        }
        self.transport.assert_chip_select(false);
        self.track(result)
    }

    /// Read the controller's temperature sensor in whole °C
    pub async fn measure_temperature(&mut self) -> Result<i32, DisplayError> {
        let mut raw = [0u8; 2];
        self.query(commands::TEMPERATURE_READ, true, &mut raw).await?;
        // Second byte carries the half-degree bit, unused
        Ok(raw[0] as i8 as i32)
    }

    async fn read_flags(&mut self) -> Result<u16, DisplayError> {
        let mut raw = [0u8; 2];
        self.query(commands::READ_FLAGS, false, &mut raw).await?;
        Ok(u16::from_le_bytes(raw))
    }

    /// Select the waveform for `mode` at `temperature`, uploading it if needed
    async fn set_waveform(&mut self, waveform: Waveform, temperature: i32) -> Result<(), DisplayError> {
        if !self.waveform.needs_new_waveform(waveform, temperature) {
            return Ok(());
        }
        let Some(offset) = self.waveform.select(waveform, temperature) else {
            return Ok(());
        };
        match self.load_waveform(offset).await {
            Ok(()) => {
                self.waveform.mark_loaded(offset);
                Ok(())
            }
            Err(e) => {
                self.waveform.invalidate();
                Err(e)
            }
        }
    }

    async fn load_waveform(&mut self, offset: u32) -> Result<(), DisplayError> {
        if self.scratch.len() < LUTD_SIZE + 1 {
            return Err(DisplayError::OutOfMemory);
        }

        self.scratch[0] = commands::LUTD;
        self.waveforms
            .read_at(offset, &mut self.scratch[1..=LUTD_SIZE])
            .await?;
        let len = lutd_length(self.scratch[1]).min(LUTD_SIZE + 1);
        let result = self
            .transport
            .write_block(&self.scratch[..len], ChipSelect::Automatic)
            .await;
        self.track(result)?;

        self.scratch[0] = commands::LUTC;
        self.waveforms
            .read_at(offset + LUTD_SIZE as u32, &mut self.scratch[1..=LUTC_SIZE])
            .await?;
        let result = self
            .transport
            .write_block(&self.scratch[..=LUTC_SIZE], ChipSelect::Automatic)
            .await;
        self.track(result)
    }

    /// Power on, choose the temperature and load the waveform for `mode`
    async fn prepare(&mut self, mode: RefreshMode, temperature: WaveformTemperature) -> Result<(), DisplayError> {
        self.power_on().await?;

        let temperature = match temperature {
            WaveformTemperature::KeepCurrent => self.waveform.temperature,
            WaveformTemperature::Measure => self.measure_temperature().await?,
        };

        let waveform = Waveform::for_refresh(mode);
        self.set_waveform(waveform, temperature).await?;
        if mode == RefreshMode::Deep {
            self.dither().await?;
        }
        Ok(())
    }

    fn check_frame(&self, frame: Frame) -> Result<(), DisplayError> {
        if frame.is_empty() || !frame.fits(self.config.size) {
            return Err(DisplayError::Error);
        }
        Ok(())
    }

    async fn update_frame(&mut self, frame: Frame, buffer: &[u8]) -> Result<(), DisplayError> {
        self.check_frame(frame)?;
        let size = self.config.size;
        if buffer.len() < size.pixel_count() {
            return Err(DisplayError::Error);
        }
        let len = 2 + packed_len(frame);
        if self.scratch.len() < len {
            return Err(DisplayError::OutOfMemory);
        }

        self.scratch[0] = commands::DATA_START_TRANSMISSION;
        self.scratch[1] = commands::BPP_4;
        pack_4bpp(
            buffer,
            size.width as usize,
            frame,
            self.mode.is_inverted(),
            &mut self.scratch[2..len],
        );

        self.command(&commands::data_window(frame, size)).await?;
        let result = self
            .transport
            .write_block(&self.scratch[..len], ChipSelect::Automatic)
            .await;
        self.track(result)
    }

    async fn refresh(&mut self, frame: Frame, mode: RefreshMode) -> Result<(), DisplayError> {
        self.check_frame(frame)?;
        let timings = match mode {
            RefreshMode::Deep => Timings::DeepClean,
            RefreshMode::Fast | RefreshMode::None => Timings::FastRefresh,
        };

        self.waveform.record_use();
        self.command(&timings.command()).await?;
        self.command(&commands::GATE_ORDER_SEQUENCE).await?;
        self.command(&commands::refresh(frame, self.config.size)).await?;
        self.wait_ready().await
    }
}

impl<T, W> DisplayBackend for Ed028tc1<'_, T, W>
where
    T: PanelTransport,
    W: WaveformSource,
{
    fn size(&self) -> PanelSize {
        self.config.size
    }

    fn set_mode(&mut self, mode: ColorMode) {
        self.mode = mode;
    }

    fn mode(&self) -> ColorMode {
        self.mode
    }

    async fn show_image_update(&mut self, frames: &[Frame], buffer: &[u8]) -> Result<(), DisplayError> {
        self.power_on().await?;
        for frame in frames {
            self.update_frame(*frame, buffer).await?;
        }
        Ok(())
    }

    async fn show_image_refresh(&mut self, frame: Frame, mode: RefreshMode) -> Result<(), DisplayError> {
        self.prepare(mode, WaveformTemperature::KeepCurrent).await?;
        self.refresh(frame, mode).await
    }

    async fn show_image(
        &mut self,
        frames: &[Frame],
        refresh_frame: Frame,
        buffer: &[u8],
        mode: RefreshMode,
    ) -> Result<(), DisplayError> {
        if self.faulted {
            self.reset_and_init().await?;
        }

        self.prepare(mode, WaveformTemperature::KeepCurrent).await?;
        for frame in frames {
            self.update_frame(*frame, buffer).await?;
        }
        if mode == RefreshMode::None {
            return Ok(());
        }
        self.refresh(refresh_frame, mode).await
    }

    async fn prepare_early_request(&mut self, mode: RefreshMode, temperature: WaveformTemperature) {
        if let Err(e) = self.prepare(mode, temperature).await {
            // The next draw starts from a fresh reset
            warn!("early prepare failed: {:?}", e);
            self.faulted = true;
        }
    }

    async fn dither(&mut self) -> Result<(), DisplayError> {
        self.command(&[commands::DITHER, commands::DITHER_START_4BPP])
            .await?;

        let deadline = Instant::now() + self.config.busy_timeout();
        loop {
            let flags = self.read_flags().await?;
            if flags & commands::FLAG_DITHER_IN_PROGRESS == 0 {
                return Ok(());
            }
            if Instant::now() >= deadline {
                self.faulted = true;
                return Err(DisplayError::Timeout);
            }
            Timer::after_millis(1).await;
        }
    }

    async fn power_on(&mut self) -> Result<(), DisplayError> {
        if self.powered {
            return Ok(());
        }
        self.command(&[commands::POWER_ON]).await?;
        self.wait_ready().await?;
        self.powered = true;
        Ok(())
    }

    async fn power_off(&mut self) -> Result<(), DisplayError> {
        if !self.powered {
            return Ok(());
        }
        self.command(&[commands::POWER_OFF]).await?;
        self.wait_ready().await?;
        self.powered = false;
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<(), DisplayError> {
        let result = self.power_off().await;
        self.transport.release();
        self.powered = false;
        result
    }

    async fn wipe_out(&mut self) -> Result<(), DisplayError> {
        let size = self.config.size;
        let plane = size.pixel_count() / 8;
        if self.scratch.len() < plane {
            return Err(DisplayError::OutOfMemory);
        }

        self.power_on().await?;
        self.command(&commands::full_window(size)).await?;

        self.scratch[..plane].fill(commands::WHITE_1BPP);
        self.transport.assert_chip_select(true);
        let mut result = self
            .transport
            .write_block(
                &[commands::DATA_START_TRANSMISSION, commands::BPP_1],
                ChipSelect::Manual,
            )
            .await;
        if result.is_ok() {
            result = self
                .transport
                .write_block(&self.scratch[..plane], ChipSelect::Manual)
                .await;
        }
        self.transport.assert_chip_select(false);
        self.track(result)?;

        self.refresh(size.full_frame(), RefreshMode::Deep).await
    }

    async fn reset_and_init(&mut self) -> Result<(), DisplayError> {
        self.transport.initialize()?;
        self.transport.reset_panel().await;

        // After reset the controller is off and has no waveform
        self.powered = false;
        self.waveform.invalidate();

        for cmd in commands::INIT_SEQUENCE {
            self.command(cmd).await?;
        }
        self.faulted = false;
        Ok(())
    }

    fn device(&self) -> Option<DeviceDescriptor> {
        Some(DeviceDescriptor { name: DEVICE_NAME })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::tests::{mock_transport, MockTransport, Wire};
    use embassy_futures::block_on;
    use papyrus_core::waveform::{lut_offset, LUT_SET_SIZE};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    const CHUNK: usize = 32767;

    /// Waveform blob large enough for every bank at every segment
    fn blob() -> Vec<u8> {
        let mut data = std::vec![0u8; LUT_SET_SIZE as usize * 14 * 5];
        for set in 0..14 * 5 {
            let base = set * LUT_SET_SIZE as usize;
            // One LUTD frame, tagged by set index
            data[base] = 0x00;
            data[base + 1] = set as u8;
            data[base + LUTD_SIZE] = 0xC0 | set as u8;
        }
        data
    }

    struct Fixture {
        wire: Rc<RefCell<Wire>>,
        blob: Vec<u8>,
        scratch: Vec<u8>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                wire: Wire::shared(),
                blob: blob(),
                scratch: std::vec![0u8; PanelConfig::default().scratch_len()],
            }
        }

        fn panel(&mut self) -> Ed028tc1<'_, MockTransport<CHUNK>, &[u8]> {
            Ed028tc1::new(
                mock_transport::<CHUNK>(&self.wire),
                &self.blob[..],
                PanelConfig::default(),
                &mut self.scratch,
            )
        }
    }

    fn first_bytes(wire: &Rc<RefCell<Wire>>) -> Vec<u8> {
        wire.borrow().writes.iter().map(|w| w[0]).collect()
    }

    #[test]
    fn test_reset_and_init_sequence() {
        let mut fx = Fixture::new();
        let wire = fx.wire.clone();
        let mut panel = fx.panel();
        block_on(panel.reset_and_init()).unwrap();

        let w = wire.borrow();
        assert_eq!(w.reset_pulses, 1);
        assert_eq!(w.writes.len(), commands::INIT_SEQUENCE.len());
        for (sent, expected) in w.writes.iter().zip(commands::INIT_SEQUENCE) {
            assert_eq!(sent.as_slice(), *expected);
        }
        assert!(w.cs_low_during_write.iter().all(|&low| low));
        assert!(!panel.is_powered());
    }

    #[test]
    fn test_power_on_is_idempotent() {
        let mut fx = Fixture::new();
        let wire = fx.wire.clone();
        let mut panel = fx.panel();
        block_on(panel.reset_and_init()).unwrap();
        wire.borrow_mut().writes.clear();

        block_on(panel.power_on()).unwrap();
        block_on(panel.power_on()).unwrap();
        assert_eq!(first_bytes(&wire), [commands::POWER_ON]);

        block_on(panel.power_off()).unwrap();
        block_on(panel.power_off()).unwrap();
        assert_eq!(first_bytes(&wire), [commands::POWER_ON, commands::POWER_OFF]);
    }

    #[test]
    fn test_fast_show_image_loads_du2_and_refreshes() {
        let mut fx = Fixture::new();
        let wire = fx.wire.clone();
        let buffer = std::vec![0x0Fu8; 480 * 600];
        let mut panel = fx.panel();
        block_on(panel.reset_and_init()).unwrap();
        wire.borrow_mut().writes.clear();

        let frame = Frame::new(0, 0, 16, 4);
        block_on(panel.show_image(&[frame], frame, &buffer, RefreshMode::Fast)).unwrap();

        let w = wire.borrow();
        let firsts: Vec<u8> = w.writes.iter().map(|b| b[0]).collect();
        assert_eq!(
            firsts,
            [
                commands::POWER_ON,
                commands::LUTD,
                commands::LUTC,
                commands::DATA_WINDOW,
                commands::DATA_START_TRANSMISSION,
                commands::TCON_SETTING,
                commands::GATE_ORDER,
                commands::DISPLAY_REFRESH,
            ]
        );

        // DU2 at the default temperature lands in segment 0 of bank 2
        let set = (lut_offset(Waveform::Du2, -1000) / LUT_SET_SIZE) as u8;
        assert_eq!(w.writes[1].len(), 66);
        assert_eq!(w.writes[1][2], set);
        assert_eq!(w.writes[2].len(), 65);
        assert_eq!(w.writes[2][1], 0xC0 | set);

        // 2 header bytes + 8 bytes per row
        assert_eq!(w.writes[4].len(), 2 + 8 * 4);
        assert_eq!(w.writes[4][1], commands::BPP_4);
        assert!(w.writes[4][2..].iter().all(|&b| b == 0xFF));
        assert_eq!(w.writes[5], Timings::FastRefresh.command());
    }

    #[test]
    fn test_waveform_reused_between_draws() {
        let mut fx = Fixture::new();
        let wire = fx.wire.clone();
        let buffer = std::vec![0u8; 480 * 600];
        let mut panel = fx.panel();
        block_on(panel.reset_and_init()).unwrap();

        let frame = Frame::new(0, 0, 16, 16);
        block_on(panel.show_image(&[frame], frame, &buffer, RefreshMode::Fast)).unwrap();
        wire.borrow_mut().writes.clear();
        block_on(panel.show_image(&[frame], frame, &buffer, RefreshMode::Fast)).unwrap();

        assert!(!first_bytes(&wire).contains(&commands::LUTD));
    }

    #[test]
    fn test_inverted_mode_inverts_pixels() {
        let mut fx = Fixture::new();
        let wire = fx.wire.clone();
        let buffer = std::vec![0x0Fu8; 480 * 600];
        let mut panel = fx.panel();
        block_on(panel.reset_and_init()).unwrap();
        panel.set_mode(ColorMode::Inverted);
        wire.borrow_mut().writes.clear();

        let frame = Frame::new(0, 0, 8, 1);
        block_on(panel.show_image_update(&[frame], &buffer)).unwrap();
        let w = wire.borrow();
        let data = w.writes.last().unwrap();
        assert_eq!(data.as_slice(), [0x10, 0x03, 0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_none_mode_skips_refresh() {
        let mut fx = Fixture::new();
        let wire = fx.wire.clone();
        let buffer = std::vec![0u8; 480 * 600];
        let mut panel = fx.panel();
        block_on(panel.reset_and_init()).unwrap();
        wire.borrow_mut().writes.clear();

        let frame = Frame::new(0, 0, 8, 8);
        block_on(panel.show_image(&[frame], frame, &buffer, RefreshMode::None)).unwrap();
        assert!(!first_bytes(&wire).contains(&commands::DISPLAY_REFRESH));
    }

    #[test]
    fn test_deep_refresh_dithers() {
        let mut fx = Fixture::new();
        let wire = fx.wire.clone();
        let buffer = std::vec![0u8; 480 * 600];
        let mut panel = fx.panel();
        block_on(panel.reset_and_init()).unwrap();
        wire.borrow_mut().writes.clear();
        // First flags read: dither running, second: done
        wire.borrow_mut().read_data = std::vec![0x00, 0x02, 0x00, 0x00];

        let frame = Frame::new(0, 0, 8, 8);
        block_on(panel.show_image(&[frame], frame, &buffer, RefreshMode::Deep)).unwrap();

        let w = wire.borrow();
        let firsts: Vec<u8> = w.writes.iter().map(|b| b[0]).collect();
        let dither_at = firsts.iter().position(|&b| b == commands::DITHER).unwrap();
        assert_eq!(firsts[dither_at + 1], commands::READ_FLAGS);
        assert_eq!(firsts[dither_at + 2], commands::READ_FLAGS);
        let tcon = w.writes.iter().find(|b| b[0] == commands::TCON_SETTING).unwrap();
        assert_eq!(tcon.as_slice(), Timings::DeepClean.command());
    }

    #[test]
    fn test_measure_temperature() {
        let mut fx = Fixture::new();
        let wire = fx.wire.clone();
        let mut panel = fx.panel();
        block_on(panel.reset_and_init()).unwrap();
        wire.borrow_mut().read_data = std::vec![0xFB, 0x80];

        assert_eq!(block_on(panel.measure_temperature()), Ok(-5));
        let w = wire.borrow();
        assert_eq!(w.writes.last().unwrap().as_slice(), [commands::TEMPERATURE_READ]);
        assert_eq!(w.cs_low_during_write.last(), Some(&true));
        assert!(w.cs_high);
        assert_eq!(w.frequencies.last(), Some(&3_000_000));
    }

    #[test]
    fn test_measured_temperature_picks_segment() {
        let mut fx = Fixture::new();
        let wire = fx.wire.clone();
        let mut panel = fx.panel();
        block_on(panel.reset_and_init()).unwrap();
        wire.borrow_mut().read_data = std::vec![25, 0];
        wire.borrow_mut().writes.clear();

        block_on(panel.prepare_early_request(RefreshMode::Fast, WaveformTemperature::Measure));
        assert_eq!(panel.last_temperature(), 25);

        let w = wire.borrow();
        let lutd = w.writes.iter().find(|b| b[0] == commands::LUTD).unwrap();
        assert_eq!(lutd[2] as u32, 14 * 2 + 8);
    }

    #[test]
    fn test_out_of_bounds_frame_rejected() {
        let mut fx = Fixture::new();
        let buffer = std::vec![0u8; 480 * 600];
        let mut panel = fx.panel();
        block_on(panel.reset_and_init()).unwrap();

        let frame = Frame::new(400, 0, 100, 10);
        let result = block_on(panel.show_image(&[frame], frame, &buffer, RefreshMode::Fast));
        assert_eq!(result, Err(DisplayError::Error));
    }

    #[test]
    fn test_small_scratch_is_out_of_memory() {
        let wire = Wire::shared();
        let blob = blob();
        let mut scratch = std::vec![0u8; 100];
        let mut panel = Ed028tc1::new(
            mock_transport::<CHUNK>(&wire),
            &blob[..],
            PanelConfig::default(),
            &mut scratch,
        );
        block_on(panel.reset_and_init()).unwrap();
        assert_eq!(block_on(panel.wipe_out()), Err(DisplayError::OutOfMemory));
    }

    #[test]
    fn test_missing_waveform_fails_load() {
        let wire = Wire::shared();
        let mut scratch = std::vec![0u8; PanelConfig::default().scratch_len()];
        let empty: &[u8] = &[];
        let mut panel = Ed028tc1::new(
            mock_transport::<CHUNK>(&wire),
            empty,
            PanelConfig::default(),
            &mut scratch,
        );
        block_on(panel.reset_and_init()).unwrap();
        let buffer = std::vec![0u8; 480 * 600];
        let frame = Frame::new(0, 0, 8, 8);
        let result = block_on(panel.show_image(&[frame], frame, &buffer, RefreshMode::Fast));
        assert_eq!(result, Err(DisplayError::WaveformLoadFailure));
    }

    #[test]
    fn test_failed_early_prepare_marks_fault() {
        let wire = Wire::shared();
        let mut scratch = std::vec![0u8; PanelConfig::default().scratch_len()];
        let empty: &[u8] = &[];
        let mut panel = Ed028tc1::new(
            mock_transport::<CHUNK>(&wire),
            empty,
            PanelConfig::default(),
            &mut scratch,
        );
        block_on(panel.reset_and_init()).unwrap();
        assert!(!panel.is_faulted());

        block_on(panel.prepare_early_request(RefreshMode::Fast, WaveformTemperature::KeepCurrent));
        assert!(panel.is_faulted());

        // The next draw resets the panel before anything else
        let buffer = std::vec![0u8; 480 * 600];
        let frame = Frame::new(0, 0, 8, 8);
        let _ = block_on(panel.show_image(&[frame], frame, &buffer, RefreshMode::Fast));
        assert_eq!(wire.borrow().reset_pulses, 2);
    }

    #[test]
    fn test_wipe_out_sends_white_plane() {
        let mut fx = Fixture::new();
        let wire = fx.wire.clone();
        let mut panel = fx.panel();
        block_on(panel.reset_and_init()).unwrap();
        wire.borrow_mut().writes.clear();

        block_on(panel.wipe_out()).unwrap();
        let w = wire.borrow();
        assert_eq!(w.writes[1], commands::full_window(PanelSize::ED028TC1));
        assert_eq!(w.writes[2].as_slice(), [0x10, 0x00]);
        // The plane exceeds one DMA transaction
        let plane: Vec<u8> = [w.writes[3].clone(), w.writes[4].clone()].concat();
        assert_eq!(w.writes[3].len(), CHUNK);
        assert_eq!(plane.len(), 480 * 600 / 8);
        assert!(plane.iter().all(|&b| b == 0xFF));
        // Header and plane share one manual transaction
        assert!(w.cs_low_during_write[2..5].iter().all(|&low| low));
        assert_eq!(w.writes.last().unwrap()[0], commands::DISPLAY_REFRESH);
    }

    #[test]
    fn test_fault_triggers_reinit_on_next_draw() {
        let mut fx = Fixture::new();
        let wire = fx.wire.clone();
        let buffer = std::vec![0u8; 480 * 600];
        let mut panel = fx.panel();
        block_on(panel.reset_and_init()).unwrap();

        // Fail the power-on command of the first draw
        let index = wire.borrow().writes.len();
        wire.borrow_mut().fail_write_at = Some(index);
        let frame = Frame::new(0, 0, 8, 8);
        let result = block_on(panel.show_image(&[frame], frame, &buffer, RefreshMode::Fast));
        assert_eq!(result, Err(DisplayError::DmaError));
        assert!(panel.is_faulted());
        assert_eq!(wire.borrow().reset_pulses, 1);

        wire.borrow_mut().fail_write_at = None;
        block_on(panel.show_image(&[frame], frame, &buffer, RefreshMode::Fast)).unwrap();
        assert!(!panel.is_faulted());
        assert_eq!(wire.borrow().reset_pulses, 2);
    }

    #[test]
    fn test_busy_timeout_reported() {
        let mut fx = Fixture::new();
        let wire = fx.wire.clone();
        let mut panel = fx.panel();
        block_on(panel.reset_and_init()).unwrap();
        wire.borrow_mut().busy = true;

        assert_eq!(block_on(panel.power_on()), Err(DisplayError::Timeout));
        assert!(!panel.is_powered());
        assert!(panel.is_faulted());
    }

    #[test]
    fn test_shutdown_releases_bus() {
        let mut fx = Fixture::new();
        let wire = fx.wire.clone();
        let mut panel = fx.panel();
        block_on(panel.reset_and_init()).unwrap();
        block_on(panel.power_on()).unwrap();

        block_on(panel.shutdown()).unwrap();
        assert_eq!(wire.borrow().released, 1);
        assert!(!panel.transport().is_initialized());
        assert_eq!(panel.device(), Some(DeviceDescriptor { name: "EInk" }));
    }
}
