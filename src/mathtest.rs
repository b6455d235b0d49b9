//! CPU math workload: pi approximation, fast inverse square root, and
//! arithmetic throughput loops. Everything is timed against the
//! microsecond timebase and printed; nothing is returned.

use core::fmt::Write;
use core::hint::black_box;

use crate::alarm::AlarmDriver;

/// Iterations per arithmetic throughput loop.
const TEST_LOOP_CNT: u32 = 1_000_000;

/// Run the full suite, printing results as they complete.
pub fn run(timer: &dyn AlarmDriver, out: &mut dyn Write) {
    let _ = writeln!(out, "\n[Math Test]");
    pi_test(timer, out);
    inv_sqrt_test(timer, out);
    int_loop_test(timer, out);
    float_loop_test(timer, out);
    double_loop_test(timer, out);
}

/// Gauss-Legendre pi. Quadratic convergence, three iterations reach
/// f64 precision.
fn pi_test(timer: &dyn AlarmDriver, out: &mut dyn Write) {
    let _ = writeln!(out, "\nCalc pi (Gauss-Legendre)");

    let mut a = 1.0f64;
    let mut b = 1.0 / libm::sqrt(2.0);
    let mut t = 0.25f64;
    let mut p = 1.0f64;

    for i in 1..=3u32 {
        let start = timer.now_us();
        let a_next = (a + b) / 2.0;
        b = libm::sqrt(a * b);
        t -= p * (a - a_next) * (a - a_next);
        a = a_next;
        p *= 2.0;
        let pi = (a + b) * (a + b) / (4.0 * t);
        let end = timer.now_us();

        let _ = writeln!(
            out,
            "Iteration {}: pi ~= {:.15} (proc time: {} us)",
            i,
            pi,
            end - start
        );
    }
}

/// Quake-style reciprocal square root, one Newton step.
fn fast_inv_sqrt(x: f32) -> f32 {
    let half = 0.5 * x;
    let i = 0x5f3759df_u32.wrapping_sub(x.to_bits() >> 1);
    let y = f32::from_bits(i);
    y * (1.5 - half * y * y)
}

fn inv_sqrt_test(timer: &dyn AlarmDriver, out: &mut dyn Write) {
    let _ = writeln!(out, "\nInverse sqrt, 1/sqrtf vs fast approximation (x{})", TEST_LOOP_CNT);

    let x = 2.0f32;

    let start = timer.now_us();
    let mut acc = 0.0f32;
    for _ in 0..TEST_LOOP_CNT {
        acc += 1.0 / libm::sqrtf(black_box(x));
    }
    let end = timer.now_us();
    black_box(acc);
    let _ = writeln!(
        out,
        "1/sqrtf({}) = {:.9} (proc time: {} us)",
        x,
        1.0 / libm::sqrtf(x),
        end - start
    );

    let start = timer.now_us();
    let mut acc = 0.0f32;
    for _ in 0..TEST_LOOP_CNT {
        acc += fast_inv_sqrt(black_box(x));
    }
    let end = timer.now_us();
    black_box(acc);
    let _ = writeln!(
        out,
        "fast_inv_sqrt({}) = {:.9} (proc time: {} us)",
        x,
        fast_inv_sqrt(x),
        end - start
    );
}

fn int_loop_test(timer: &dyn AlarmDriver, out: &mut dyn Write) {
    let _ = writeln!(out, "\nint32 arithmetic (x{})", TEST_LOOP_CNT);

    let start = timer.now_us();
    let mut acc: i32 = 1;
    for _ in 0..TEST_LOOP_CNT {
        acc = acc.wrapping_add(black_box(3));
    }
    black_box(acc);
    let _ = writeln!(out, "add : {} us", timer.now_us() - start);

    let start = timer.now_us();
    let mut acc: i32 = 1;
    for _ in 0..TEST_LOOP_CNT {
        acc = acc.wrapping_sub(black_box(3));
    }
    black_box(acc);
    let _ = writeln!(out, "sub : {} us", timer.now_us() - start);

    let start = timer.now_us();
    let mut acc: i32 = 1;
    for _ in 0..TEST_LOOP_CNT {
        acc = acc.wrapping_mul(black_box(3));
    }
    black_box(acc);
    let _ = writeln!(out, "mul : {} us", timer.now_us() - start);

    let start = timer.now_us();
    let mut acc: i32 = i32::MAX;
    for _ in 0..TEST_LOOP_CNT {
        acc = black_box(acc) / black_box(3).max(1);
        if acc == 0 {
            acc = i32::MAX;
        }
    }
    black_box(acc);
    let _ = writeln!(out, "div : {} us", timer.now_us() - start);
}

fn float_loop_test(timer: &dyn AlarmDriver, out: &mut dyn Write) {
    let _ = writeln!(out, "\nfloat arithmetic (x{})", TEST_LOOP_CNT);

    let start = timer.now_us();
    let mut acc = 1.0f32;
    for _ in 0..TEST_LOOP_CNT {
        acc += black_box(1.5f32);
    }
    black_box(acc);
    let _ = writeln!(out, "add : {} us", timer.now_us() - start);

    let start = timer.now_us();
    let mut acc = 1.0f32;
    for _ in 0..TEST_LOOP_CNT {
        acc -= black_box(1.5f32);
    }
    black_box(acc);
    let _ = writeln!(out, "sub : {} us", timer.now_us() - start);

    let start = timer.now_us();
    let mut acc = 1.0f32;
    for _ in 0..TEST_LOOP_CNT {
        acc *= black_box(1.0000001f32);
    }
    black_box(acc);
    let _ = writeln!(out, "mul : {} us", timer.now_us() - start);

    let start = timer.now_us();
    let mut acc = 1.0f32;
    for _ in 0..TEST_LOOP_CNT {
        acc /= black_box(1.0000001f32);
    }
    black_box(acc);
    let _ = writeln!(out, "div : {} us", timer.now_us() - start);
}

fn double_loop_test(timer: &dyn AlarmDriver, out: &mut dyn Write) {
    let _ = writeln!(out, "\ndouble arithmetic (x{})", TEST_LOOP_CNT);

    let start = timer.now_us();
    let mut acc = 1.0f64;
    for _ in 0..TEST_LOOP_CNT {
        acc += black_box(1.5f64);
    }
    black_box(acc);
    let _ = writeln!(out, "add : {} us", timer.now_us() - start);

    let start = timer.now_us();
    let mut acc = 1.0f64;
    for _ in 0..TEST_LOOP_CNT {
        acc -= black_box(1.5f64);
    }
    black_box(acc);
    let _ = writeln!(out, "sub : {} us", timer.now_us() - start);

    let start = timer.now_us();
    let mut acc = 1.0f64;
    for _ in 0..TEST_LOOP_CNT {
        acc *= black_box(1.0000001f64);
    }
    black_box(acc);
    let _ = writeln!(out, "mul : {} us", timer.now_us() - start);

    let start = timer.now_us();
    let mut acc = 1.0f64;
    for _ in 0..TEST_LOOP_CNT {
        acc /= black_box(1.0000001f64);
    }
    black_box(acc);
    let _ = writeln!(out, "div : {} us", timer.now_us() - start);
}
