use super::{Shutdown, VolumeMixer};
use crate::config::MixerConfig;
use crate::error::Error;
use crate::Result;
use log::{debug, error, info, trace, warn};
use std::process::{Command, Output};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration, MissedTickBehavior};

const AMIXER: &str = "amixer";

// Volumes use amixer's mapped scale (-M).
pub struct AmixerMixer {
    device: String,
    control: String,
    poll_interval: Duration,
    shutdown: Option<Shutdown>,
}

impl AmixerMixer {
    pub fn new(config: &MixerConfig, poll_interval: Duration) -> Self {
        Self {
            device: config.device.clone(),
            control: config.control.clone(),
            poll_interval,
            shutdown: None,
        }
    }

    fn get_args(device: &str, control: &str) -> Vec<String> {
        vec![
            "-M".to_string(),
            "-D".to_string(),
            device.to_string(),
            "sget".to_string(),
            control.to_string(),
        ]
    }

    fn set_args(device: &str, control: &str, volume: f64) -> Vec<String> {
        let percent = (volume * 100.0).round() as u32;
        vec![
            "-M".to_string(),
            "-D".to_string(),
            device.to_string(),
            "-q".to_string(),
            "sset".to_string(),
            control.to_string(),
            format!("{}%", percent),
        ]
    }

    fn run(args: &[String]) -> Result<String> {
        let output = Command::new(AMIXER)
            .args(args)
            .output()
            .map_err(|e| Error::Mixer(format!("Failed to run {}: {}", AMIXER, e)))?;
        Self::check_output(output)
    }

    fn check_output(output: Output) -> Result<String> {
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Mixer(format!("{} failed: {}", AMIXER, stderr.trim())).into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn watch_volume(
        device: String,
        control: String,
        poll_interval: Duration,
        changes: mpsc::UnboundedSender<f64>,
        mut shutdown: tokio::sync::oneshot::Receiver<()>,
    ) {
        let args = Self::get_args(&device, &control);
        let mut ticker = interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_volume: Option<f64> = None;

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    debug!("Mixer watcher stopping");
                    break;
                }
                _ = ticker.tick() => {
                    let output = match tokio::process::Command::new(AMIXER).args(&args).output().await {
                        Ok(output) => output,
                        Err(e) => {
                            error!("Failed to run {}: {}", AMIXER, e);
                            continue;
                        }
                    };

                    let volume = match Self::check_output(output).and_then(|stdout| parse_volume(&stdout)) {
                        Ok(volume) => volume,
                        Err(e) => {
                            warn!("Failed to read volume: {}", e);
                            continue;
                        }
                    };

                    if last_volume != Some(volume) {
                        trace!("Mixer volume now {:.2}", volume);
                        last_volume = Some(volume);
                        if changes.send(volume).is_err() {
                            break;
                        }
                    }
                }
            }
        }
    }
}

impl VolumeMixer for AmixerMixer {
    fn open(&mut self, changes: mpsc::UnboundedSender<f64>) -> Result<()> {
        if self.shutdown.is_some() {
            error!("Tried to open already-open mixer");
            return Ok(());
        }

        // Fail early if the control does not exist.
        let volume = self.volume()?;
        info!(
            "Opened mixer {}/{} at {:.0}%",
            self.device,
            self.control,
            volume * 100.0
        );

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::Mixer(format!("No runtime to watch the mixer on: {}", e)))?;
        let (shutdown, shutdown_rx) = Shutdown::new();
        runtime.spawn(Self::watch_volume(
            self.device.clone(),
            self.control.clone(),
            self.poll_interval,
            changes,
            shutdown_rx,
        ));
        self.shutdown = Some(shutdown);
        Ok(())
    }

    fn close(&mut self) {
        if let Some(mut shutdown) = self.shutdown.take() {
            shutdown.signal();
            info!("Closed mixer {}/{}", self.device, self.control);
        }
    }

    fn volume(&self) -> Result<f64> {
        let stdout = Self::run(&Self::get_args(&self.device, &self.control))?;
        parse_volume(&stdout)
    }

    fn set_volume(&mut self, volume: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(Error::VolumeOutOfRange(volume).into());
        }
        debug!("Setting volume {:.2}", volume);
        Self::run(&Self::set_args(&self.device, &self.control, volume))?;
        Ok(())
    }
}

// Average of the playback `[NN%]` readings in `amixer sget` output.
fn parse_volume(output: &str) -> Result<f64> {
    let percents: Vec<f64> = output
        .lines()
        .filter(|line| line.contains("Playback"))
        .filter_map(|line| {
            let start = line.find('[')?;
            let end = start + line[start..].find("%]")?;
            line[start + 1..end].trim().parse::<f64>().ok()
        })
        .collect();

    if percents.is_empty() {
        return Err(Error::Mixer("Unable to determine volume range".to_string()).into());
    }

    let average = percents.iter().sum::<f64>() / percents.len() as f64;
    Ok((average / 100.0).clamp(0.0, 1.0))
}
