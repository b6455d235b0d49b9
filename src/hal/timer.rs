//! TIMER0 alarm channels behind [`AlarmDriver`].
//!
//! One alarm channel per pool slot. The channels live in a global so the
//! four `TIMER0_IRQ_n` handlers can acknowledge them; the pool itself is
//! the only other interrupt-shared state in the firmware.

use core::cell::RefCell;
use core::fmt::Write;
use core::sync::atomic::{AtomicBool, Ordering};

use critical_section::Mutex;
use rp235x_hal as hal;

use hal::fugit::MicrosDurationU32;
use hal::pac::interrupt;
use hal::timer::{Alarm, Alarm0, Alarm1, Alarm2, Alarm3, CopyableTimer0};

use crate::alarm::{AlarmDriver, AlarmError, AlarmHandle, AlarmPool};

type HwTimer = hal::Timer<CopyableTimer0>;

/// The firmware's alarm pool, shared between the dispatcher and the
/// TIMER0 interrupt handlers.
pub static ALARM_POOL: AlarmPool = AlarmPool::new();

struct Channels {
    a0: Alarm0<CopyableTimer0>,
    a1: Alarm1<CopyableTimer0>,
    a2: Alarm2<CopyableTimer0>,
    a3: Alarm3<CopyableTimer0>,
}

static CHANNELS: Mutex<RefCell<Option<Channels>>> = Mutex::new(RefCell::new(None));

/// Set by the interrupt handlers after a notification print; the
/// foreground loop redraws the prompt and the line under edit.
static PROMPT_STALE: AtomicBool = AtomicBool::new(false);

/// Take-and-clear the stale-prompt flag.
pub fn take_prompt_stale() -> bool {
    PROMPT_STALE.swap(false, Ordering::Relaxed)
}

/// [`AlarmDriver`] over the four TIMER0 alarm channels.
pub struct HwAlarmDriver {
    timer: HwTimer,
}

impl HwAlarmDriver {
    /// Claim all four alarm channels and park them for the IRQ handlers.
    ///
    /// Fails if any channel was already taken from this timer.
    pub fn new(timer: &mut HwTimer) -> Option<Self> {
        let mut a0 = timer.alarm_0()?;
        let mut a1 = timer.alarm_1()?;
        let mut a2 = timer.alarm_2()?;
        let mut a3 = timer.alarm_3()?;
        a0.enable_interrupt();
        a1.enable_interrupt();
        a2.enable_interrupt();
        a3.enable_interrupt();

        critical_section::with(|cs| {
            CHANNELS.borrow(cs).replace(Some(Channels { a0, a1, a2, a3 }));
        });
        Some(Self { timer: *timer })
    }
}

impl AlarmDriver for HwAlarmDriver {
    fn now_us(&self) -> u64 {
        self.timer.get_counter().ticks()
    }

    fn schedule_once(&self, delay_us: u64, slot: usize) -> Result<AlarmHandle, AlarmError> {
        let delay = u32::try_from(delay_us).map_err(|_| AlarmError::DurationTooLong)?;
        let duration = MicrosDurationU32::micros(delay);

        critical_section::with(|cs| {
            let mut channels = CHANNELS.borrow_ref_mut(cs);
            let channels = channels.as_mut().ok_or(AlarmError::ScheduleFailed)?;
            let armed = match slot {
                0 => channels.a0.schedule(duration),
                1 => channels.a1.schedule(duration),
                2 => channels.a2.schedule(duration),
                3 => channels.a3.schedule(duration),
                _ => return Err(AlarmError::ScheduleFailed),
            };
            armed.map_err(|_| AlarmError::ScheduleFailed)?;
            Ok(AlarmHandle(slot as u32))
        })
    }

    fn cancel(&self, handle: AlarmHandle) {
        critical_section::with(|cs| {
            if let Some(channels) = CHANNELS.borrow_ref_mut(cs).as_mut() {
                let _ = match handle.0 {
                    0 => channels.a0.cancel(),
                    1 => channels.a1.cancel(),
                    2 => channels.a2.cancel(),
                    3 => channels.a3.cancel(),
                    _ => Ok(()),
                };
            }
        });
    }
}

/// Acknowledge channel `slot`, free its pool entry and announce it.
fn service_alarm(slot: usize) {
    critical_section::with(|cs| {
        if let Some(channels) = CHANNELS.borrow_ref_mut(cs).as_mut() {
            match slot {
                0 => channels.a0.clear_interrupt(),
                1 => channels.a1.clear_interrupt(),
                2 => channels.a2.clear_interrupt(),
                _ => channels.a3.clear_interrupt(),
            }
        }
    });

    // None here means the slot was cancelled right before the interrupt
    // was taken; stay quiet in that case.
    if let Some(fired) = ALARM_POOL.on_fire(slot) {
        super::uart::with_writer(|w| {
            let _ = write!(
                w,
                "\nTimer #{} Alarm! (Set time : {})\n",
                fired.slot_no, fired.requested_s
            );
        });
        PROMPT_STALE.store(true, Ordering::Relaxed);
    }
}

#[interrupt]
fn TIMER0_IRQ_0() {
    service_alarm(0);
}

#[interrupt]
fn TIMER0_IRQ_1() {
    service_alarm(1);
}

#[interrupt]
fn TIMER0_IRQ_2() {
    service_alarm(2);
}

#[interrupt]
fn TIMER0_IRQ_3() {
    service_alarm(3);
}
