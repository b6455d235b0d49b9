//! Hardware one-shot alarm slot manager.
//!
//! A fixed pool of [`MAX_ALARMS`] slots, one per TIMER0 alarm channel.
//! The foreground dispatcher allocates, queries and cancels; the alarm
//! interrupt frees. Both sides mutate the same slot array, so every
//! operation runs inside one `critical_section::with` block — the
//! interrupt can never observe (or tear) a half-updated slot, and a
//! cancellation can never race the firing of the same channel.

use core::cell::RefCell;
use core::fmt;

use critical_section::Mutex;

/// Number of hardware alarm channels on TIMER0.
pub const MAX_ALARMS: usize = 4;

/// Longest accepted alarm duration, seconds.
pub const MAX_TIMER_SECONDS: i32 = 3600;

/// Opaque hardware alarm identifier returned by the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlarmHandle(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlarmError {
    /// Requested duration was zero or negative.
    InvalidDuration,
    /// Requested duration exceeds [`MAX_TIMER_SECONDS`].
    DurationTooLong,
    /// Every slot is already running.
    Exhausted,
    /// The driver failed to arm the hardware alarm.
    ScheduleFailed,
    /// Cancel target is not running.
    NotRunning,
}

impl fmt::Display for AlarmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlarmError::InvalidDuration => {
                write!(f, "Error: Invalid timer duration. Must be positive.")
            }
            AlarmError::DurationTooLong => write!(
                f,
                "Error: Timer duration exceeds maximum of {} seconds.",
                MAX_TIMER_SECONDS
            ),
            AlarmError::Exhausted => write!(
                f,
                "Error: All {} hardware timers are in use.",
                MAX_ALARMS
            ),
            AlarmError::ScheduleFailed => write!(f, "Error: Failed to set timer."),
            AlarmError::NotRunning => write!(f, "Error: Timer is not running."),
        }
    }
}

/// One-shot alarm hardware behind the pool.
///
/// `schedule_once` arms channel `slot`; when it fires, the interrupt glue
/// must call [`AlarmPool::on_fire`] with the same slot index.
pub trait AlarmDriver {
    /// Monotonic microsecond counter.
    fn now_us(&self) -> u64;

    /// Arm a one-shot alarm `delay_us` from now on channel `slot`.
    fn schedule_once(&self, delay_us: u64, slot: usize) -> Result<AlarmHandle, AlarmError>;

    /// Disarm a previously scheduled alarm.
    fn cancel(&self, handle: AlarmHandle);
}

#[derive(Clone, Copy)]
struct AlarmSlot {
    in_use: bool,
    start_us: u64,
    duration_us: u64,
    requested_s: i32,
    handle: Option<AlarmHandle>,
}

impl AlarmSlot {
    const FREE: AlarmSlot = AlarmSlot {
        in_use: false,
        start_us: 0,
        duration_us: 0,
        requested_s: 0,
        handle: None,
    };
}

/// Status of one running slot, as reported by [`AlarmPool::status`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlarmStatus {
    /// Requested duration, seconds.
    pub requested_s: i32,
    /// Time left, rounded to the nearest second.
    pub remaining_s: u32,
}

/// Details of a fired slot, for the notification print.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FiredAlarm {
    /// 1-based slot number.
    pub slot_no: usize,
    pub requested_s: i32,
}

/// Fixed pool of hardware alarm slots.
///
/// Interior mutability: all methods take `&self` so the pool can live in
/// a `static` reachable from both the foreground loop and the alarm IRQ.
pub struct AlarmPool {
    slots: Mutex<RefCell<[AlarmSlot; MAX_ALARMS]>>,
}

impl AlarmPool {
    pub const fn new() -> Self {
        Self {
            slots: Mutex::new(RefCell::new([AlarmSlot::FREE; MAX_ALARMS])),
        }
    }

    /// Allocate a free slot and arm its hardware alarm for `seconds`.
    ///
    /// Returns the 1-based slot number. Rejects out-of-range durations and
    /// pool exhaustion without touching any state. The hardware alarm is
    /// armed inside the critical section, so it cannot fire before the
    /// slot is marked in use.
    pub fn allocate(&self, seconds: i32, driver: &dyn AlarmDriver) -> Result<usize, AlarmError> {
        if seconds <= 0 {
            return Err(AlarmError::InvalidDuration);
        }
        if seconds > MAX_TIMER_SECONDS {
            return Err(AlarmError::DurationTooLong);
        }

        critical_section::with(|cs| {
            let mut slots = self.slots.borrow_ref_mut(cs);
            let idx = slots
                .iter()
                .position(|s| !s.in_use)
                .ok_or(AlarmError::Exhausted)?;

            let duration_us = seconds as u64 * 1_000_000;
            let handle = driver.schedule_once(duration_us, idx)?;
            slots[idx] = AlarmSlot {
                in_use: true,
                start_us: driver.now_us(),
                duration_us,
                requested_s: seconds,
                handle: Some(handle),
            };
            Ok(idx + 1)
        })
    }

    /// Free a slot from the hardware callback context.
    ///
    /// Returns what to announce, or `None` if the slot was already free
    /// (e.g. cancelled just before the interrupt was taken).
    pub fn on_fire(&self, slot: usize) -> Option<FiredAlarm> {
        critical_section::with(|cs| {
            let mut slots = self.slots.borrow_ref_mut(cs);
            let s = slots.get_mut(slot)?;
            if !s.in_use {
                return None;
            }
            let fired = FiredAlarm {
                slot_no: slot + 1,
                requested_s: s.requested_s,
            };
            *s = AlarmSlot::FREE;
            Some(fired)
        })
    }

    /// Cancel a running slot (1-based number) and disarm its alarm.
    ///
    /// The disarm happens inside the same critical section that frees the
    /// slot, so firing and cancellation are mutually exclusive.
    pub fn cancel(&self, slot_no: usize, driver: &dyn AlarmDriver) -> Result<(), AlarmError> {
        critical_section::with(|cs| {
            let mut slots = self.slots.borrow_ref_mut(cs);
            let s = slots
                .get_mut(slot_no.wrapping_sub(1))
                .ok_or(AlarmError::NotRunning)?;
            if !s.in_use {
                return Err(AlarmError::NotRunning);
            }
            if let Some(handle) = s.handle {
                driver.cancel(handle);
            }
            *s = AlarmSlot::FREE;
            Ok(())
        })
    }

    /// Snapshot of every slot; `None` entries are free.
    ///
    /// Remaining time is `duration - elapsed`, clamped at zero and rounded
    /// to the nearest second.
    pub fn status(&self, now_us: u64) -> [Option<AlarmStatus>; MAX_ALARMS] {
        critical_section::with(|cs| {
            let slots = self.slots.borrow_ref(cs);
            let mut out = [None; MAX_ALARMS];
            for (i, s) in slots.iter().enumerate() {
                if s.in_use {
                    let elapsed = now_us.wrapping_sub(s.start_us);
                    let remaining = s.duration_us.saturating_sub(elapsed);
                    out[i] = Some(AlarmStatus {
                        requested_s: s.requested_s,
                        remaining_s: ((remaining + 500_000) / 1_000_000) as u32,
                    });
                }
            }
            out
        })
    }

    /// True if any slot is running.
    pub fn any_running(&self) -> bool {
        critical_section::with(|cs| self.slots.borrow_ref(cs).iter().any(|s| s.in_use))
    }
}

impl Default for AlarmPool {
    fn default() -> Self {
        Self::new()
    }
}
