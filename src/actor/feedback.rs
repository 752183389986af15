//! Feedback Actor: audible confirmation of accepted messages.
//!
//! The store sends a [`MessageChanged`] for every accepted update; this
//! actor turns each one into a short burst of buzzer pulses on its own
//! thread, so neither the request handler nor the renderer waits on the
//! beeps.

use super::messages::MessageChanged;
use crossbeam_channel::Receiver;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default sysfs GPIO root.
pub const SYSFS_GPIO: &str = "/sys/class/gpio";

/// A two-state output that makes a sound while on.
pub trait PulseOutput: Send {
    /// Switch the output on or off.
    fn set(&mut self, on: bool) -> io::Result<()>;
}

/// Signal `count` pulses of `duration` on, each followed by `duration` off.
///
/// The output is left off, even if a write fails part way.
pub fn signal<P: PulseOutput + ?Sized>(output: &mut P, count: u32, duration: Duration) -> io::Result<()> {
    for _ in 0..count {
        if let Err(e) = output.set(true) {
            let _ = output.set(false);
            return Err(e);
        }
        thread::sleep(duration);
        output.set(false)?;
        thread::sleep(duration);
    }
    Ok(())
}

/// Feedback actor that beeps for every accepted message.
pub struct FeedbackActor {
    /// Handle to the feedback thread.
    handle: Option<JoinHandle<()>>,
}

impl FeedbackActor {
    /// Spawn the feedback thread.
    ///
    /// # Arguments
    ///
    /// * `receiver` - Channel the store announces accepted messages on.
    /// * `output` - Buzzer (or bell) to pulse.
    /// * `count` - Pulses per accepted message.
    /// * `duration` - On time and off time of each pulse.
    ///
    /// The thread exits once every sender of `receiver` is dropped.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the feedback thread.
    pub fn spawn(
        receiver: Receiver<MessageChanged>,
        output: Box<dyn PulseOutput>,
        count: u32,
        duration: Duration,
    ) -> Self {
        let handle = thread::Builder::new()
            .name("dotnote-feedback".to_string())
            .spawn(move || Self::run_loop(&receiver, output, count, duration))
            .expect("Failed to spawn feedback thread");

        Self {
            handle: Some(handle),
        }
    }

    /// Wait for the feedback thread to finish.
    ///
    /// Only returns after the store (and every other sender) is dropped.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main feedback loop.
    fn run_loop(
        receiver: &Receiver<MessageChanged>,
        mut output: Box<dyn PulseOutput>,
        count: u32,
        duration: Duration,
    ) {
        for event in receiver {
            debug!(revision = event.revision, count, "signalling message change");
            if let Err(e) = signal(output.as_mut(), count, duration) {
                warn!(error = %e, "buzzer pulse failed");
            }
        }
        debug!("feedback loop stopped");
    }
}

/// Buzzer on a GPIO pin driven through the Linux sysfs interface.
pub struct GpioBuzzer {
    root: PathBuf,
    pin: u32,
    value: File,
}

impl GpioBuzzer {
    /// Export `pin` under `/sys/class/gpio` and configure it as an output.
    pub fn open(pin: u32) -> io::Result<Self> {
        Self::with_root(Path::new(SYSFS_GPIO), pin)
    }

    /// Same as [`GpioBuzzer::open`] with a different sysfs root.
    pub fn with_root(root: &Path, pin: u32) -> io::Result<Self> {
        let pin_dir = root.join(format!("gpio{pin}"));
        if !pin_dir.exists() {
            fs::write(root.join("export"), pin.to_string())?;
        }
        fs::write(pin_dir.join("direction"), "out")?;
        let value = OpenOptions::new().write(true).open(pin_dir.join("value"))?;

        info!(pin, "buzzer ready");
        let mut buzzer = Self {
            root: root.to_path_buf(),
            pin,
            value,
        };
        buzzer.set(false)?;
        Ok(buzzer)
    }
}

impl PulseOutput for GpioBuzzer {
    fn set(&mut self, on: bool) -> io::Result<()> {
        self.value.seek(SeekFrom::Start(0))?;
        self.value.write_all(if on { b"1" } else { b"0" })?;
        self.value.flush()
    }
}

impl Drop for GpioBuzzer {
    fn drop(&mut self) {
        let _ = self.set(false);
        let _ = fs::write(self.root.join("unexport"), self.pin.to_string());
    }
}

/// Rings the terminal bell on each pulse. For development machines
/// without a buzzer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl PulseOutput for TerminalBell {
    fn set(&mut self, on: bool) -> io::Result<()> {
        if on {
            let mut stderr = io::stderr();
            stderr.write_all(b"\x07")?;
            stderr.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use std::sync::{Arc, Mutex};

    /// Records every state change.
    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<bool>>>);

    impl PulseOutput for Recorder {
        fn set(&mut self, on: bool) -> io::Result<()> {
            self.0.lock().unwrap().push(on);
            Ok(())
        }
    }

    #[test]
    fn test_signal_n_pulses() {
        let mut recorder = Recorder::default();
        signal(&mut recorder, 3, Duration::ZERO).unwrap();
        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec![true, false, true, false, true, false]
        );
    }

    #[test]
    fn test_failed_pulse_leaves_output_off() {
        struct Flaky(Vec<bool>);
        impl PulseOutput for Flaky {
            fn set(&mut self, on: bool) -> io::Result<()> {
                self.0.push(on);
                if on {
                    Err(io::Error::new(io::ErrorKind::Other, "stuck"))
                } else {
                    Ok(())
                }
            }
        }

        let mut flaky = Flaky(Vec::new());
        assert!(signal(&mut flaky, 2, Duration::ZERO).is_err());
        assert_eq!(flaky.0.last(), Some(&false));
    }

    #[test]
    fn test_actor_beeps_per_event_and_stops_when_senders_drop() {
        let recorder = Recorder::default();
        let (tx, rx) = bounded(4);
        let actor = FeedbackActor::spawn(rx, Box::new(recorder.clone()), 2, Duration::ZERO);

        tx.send(MessageChanged { revision: 1, chars: 3 }).unwrap();
        tx.send(MessageChanged { revision: 2, chars: 3 }).unwrap();
        drop(tx);
        actor.join();

        assert_eq!(recorder.0.lock().unwrap().len(), 2 * 2 * 2);
    }

    #[test]
    fn test_gpio_buzzer_writes_sysfs_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let pin_dir = root.join("gpio23");
        fs::create_dir_all(&pin_dir).unwrap();
        fs::write(pin_dir.join("value"), "").unwrap();

        let mut buzzer = GpioBuzzer::with_root(root, 23).unwrap();
        assert_eq!(fs::read_to_string(pin_dir.join("direction")).unwrap(), "out");
        assert_eq!(fs::read_to_string(pin_dir.join("value")).unwrap(), "0");

        buzzer.set(true).unwrap();
        assert_eq!(fs::read_to_string(pin_dir.join("value")).unwrap(), "1");

        drop(buzzer);
        assert_eq!(fs::read_to_string(pin_dir.join("value")).unwrap(), "0");
        assert_eq!(fs::read_to_string(root.join("unexport")).unwrap(), "23");
        assert!(!root.join("export").exists());
    }
}
