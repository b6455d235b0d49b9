//! Command table, dispatcher and handlers.

use core::fmt::Write;

use super::console::ConsoleConfig;
use super::parser::{parse_dec, parse_hex, parse_hex_color, Args};
use super::{ConsoleError, VERSION};
use crate::alarm::{AlarmDriver, AlarmError, AlarmPool};
use crate::ansi;
use crate::board::{
    Board, Clock, Mailbox, FLASH_SIZE_MB, GPIO_MAX_PIN, MCU_NAME, MULTI_CORE_TEST_DATA, PCB_NAME,
    PROC_NEOPIXEL_FADE, RAM_SIZE_KB,
};
use crate::mathtest;

/// Most words one `rnd` invocation will draw from the TRNG.
const RND_MAX_COUNT: i32 = 64;

/// Collaborators handed to every command handler.
pub struct CmdContext<'a> {
    pub board: &'a mut dyn Board,
    pub alarms: &'a AlarmPool,
    pub timer: &'a dyn AlarmDriver,
    pub mailbox: &'a mut dyn Mailbox,
}

pub type CmdHandler =
    fn(&Args<'_>, &mut CmdContext<'_>, &mut dyn Write) -> Result<(), ConsoleError>;

/// Command identity, independent of the name string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmdId {
    Help,
    Cls,
    Sys,
    Rst,
    MemDump,
    Reg,
    I2c,
    Gpio,
    Pixel,
    Timer,
    Rnd,
    Sha,
    MathTest,
    MulticoreTest,
}

/// One row of the command table.
pub struct CommandEntry {
    pub name: &'static str,
    pub id: CmdId,
    pub handler: CmdHandler,
    pub brief: &'static str,
    pub min_args: u8,
    pub max_args: u8,
}

impl CommandEntry {
    fn args_ok(&self, supplied: usize) -> bool {
        supplied >= self.min_args as usize && supplied <= self.max_args as usize
    }
}

/// The full command surface, scanned first-match-by-name.
pub static COMMANDS: &[CommandEntry] = &[
    CommandEntry { name: "help", id: CmdId::Help,          handler: cmd_help,    brief: "Show this help message",                          min_args: 0, max_args: 0 },
    CommandEntry { name: "cls",  id: CmdId::Cls,           handler: cmd_cls,     brief: "Display Clear",                                   min_args: 0, max_args: 0 },
    CommandEntry { name: "sys",  id: CmdId::Sys,           handler: cmd_sys,     brief: "Show system information",                         min_args: 0, max_args: 0 },
    CommandEntry { name: "rst",  id: CmdId::Rst,           handler: cmd_rst,     brief: "Reboot",                                          min_args: 0, max_args: 0 },
    CommandEntry { name: "memd", id: CmdId::MemDump,       handler: cmd_mem_dump, brief: "Memory Dump Command. args -> (#address, #length)", min_args: 2, max_args: 2 },
    CommandEntry { name: "reg",  id: CmdId::Reg,           handler: cmd_reg,     brief: "Register read/write: reg #addr r|w bits [#val]",  min_args: 3, max_args: 4 },
    CommandEntry { name: "i2c",  id: CmdId::I2c,           handler: cmd_i2c,     brief: "I2C control (port, command)",                     min_args: 2, max_args: 2 },
    CommandEntry { name: "gpio", id: CmdId::Gpio,          handler: cmd_gpio,    brief: "Control GPIO pin (pin, value)",                   min_args: 2, max_args: 2 },
    CommandEntry { name: "px",   id: CmdId::Pixel,         handler: cmd_pixel,   brief: "Control NeoPixel (command, args)",                min_args: 1, max_args: 2 },
    CommandEntry { name: "tm",   id: CmdId::Timer,         handler: cmd_timer,   brief: "Set timer alarm (seconds)",                       min_args: 0, max_args: 1 },
    CommandEntry { name: "rnd",  id: CmdId::Rnd,           handler: cmd_rnd,     brief: "Generate true random numbers using TRNG",        min_args: 1, max_args: 1 },
    CommandEntry { name: "sha",  id: CmdId::Sha,           handler: cmd_sha,     brief: "Calc SHA-256 Hash using H/W Accelerator",         min_args: 1, max_args: 1 },
    CommandEntry { name: "mt",   id: CmdId::MathTest,      handler: cmd_mt,      brief: "Math test",                                       min_args: 0, max_args: 0 },
    CommandEntry { name: "mct",  id: CmdId::MulticoreTest, handler: cmd_mct,     brief: "Multi Core test",                                 min_args: 0, max_args: 0 },
];

/// Resolvable view over a command table.
pub struct CommandSet {
    entries: &'static [CommandEntry],
}

impl CommandSet {
    pub const fn new() -> Self {
        Self { entries: COMMANDS }
    }

    /// Table injection point for tests.
    pub const fn with_entries(entries: &'static [CommandEntry]) -> Self {
        Self { entries }
    }

    /// First entry whose name matches exactly (case-sensitive).
    pub fn resolve(&self, name: &str) -> Option<&'static CommandEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn entries(&self) -> &'static [CommandEntry] {
        self.entries
    }
}

impl Default for CommandSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve and run one tokenized line.
///
/// Argument-count validation against the table is a configuration switch
/// ([`ConsoleConfig::validate_arg_counts`]); handlers keep their own
/// positional checks either way.
pub fn execute(
    set: &CommandSet,
    config: &ConsoleConfig,
    args: &Args<'_>,
    ctx: &mut CmdContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let Some(entry) = set.resolve(args.cmd()) else {
        let _ = writeln!(
            out,
            "{}[ERROR] Unknown command. Type 'help' for available commands.{}",
            ansi::FG_RED,
            ansi::RESET
        );
        return Err(ConsoleError::UnknownCommand);
    };

    let supplied = args.argc.saturating_sub(1);
    if config.validate_arg_counts && !entry.args_ok(supplied) {
        let _ = writeln!(
            out,
            "Error: Invalid number of arguments. Expected {}-{}, got {}",
            entry.min_args, entry.max_args, supplied
        );
        return Err(ConsoleError::InvalidArgCount);
    }

    (entry.handler)(args, ctx, out)
}

/// Banner shown at startup and by `help`.
pub fn print_banner(out: &mut dyn Write) {
    let _ = writeln!(out, "\nDebug Command Monitor for {} ({})", MCU_NAME, VERSION);
    let _ = writeln!(out, "Type 'help' for available commands");
}

// --- Command Implementations ---

fn cmd_help(
    _args: &Args<'_>,
    _ctx: &mut CmdContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    print_banner(out);

    let _ = writeln!(out, "\nAvailable {} commands:", COMMANDS.len());
    for entry in COMMANDS {
        let _ = writeln!(out, "  {:<10} - {}", entry.name, entry.brief);
    }
    Ok(())
}

fn cmd_cls(
    _args: &Args<'_>,
    _ctx: &mut CmdContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let _ = write!(out, "{}", ansi::CLS);
    Ok(())
}

fn cmd_sys(
    _args: &Args<'_>,
    ctx: &mut CmdContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let _ = writeln!(out, "\n[System Information]");
    let _ = writeln!(out, "FW : {}", VERSION);

    let _ = writeln!(out, "\n[PCB Info]");
    let _ = writeln!(out, "PCB Name : {}", PCB_NAME);
    let _ = writeln!(out, "MCU : {}", MCU_NAME);
    let _ = writeln!(out, "CPU : Arm Cortex-M33 (DualCore)");
    let _ = writeln!(out, "CPU temp = {:.2} C", ctx.board.cpu_temp_c());

    let _ = writeln!(out, "\n[Mem Info]");
    let _ = writeln!(out, "Flash Size : {} MB", FLASH_SIZE_MB);
    let _ = writeln!(out, "RAM Size : {} KB", RAM_SIZE_KB);

    let _ = writeln!(out, "\n[Clock Info]");
    let _ = writeln!(out, "CLK_REF : {} MHz", ctx.board.clock_hz(Clock::Ref) / 1_000_000);
    let _ = writeln!(out, "CLK_SYS : {} MHz", ctx.board.clock_hz(Clock::Sys) / 1_000_000);
    let _ = writeln!(out, "CLK_USB : {} MHz", ctx.board.clock_hz(Clock::Usb) / 1_000_000);
    let _ = writeln!(out, "CLK_ADC : {} MHz", ctx.board.clock_hz(Clock::Adc) / 1_000_000);
    Ok(())
}

fn cmd_rst(
    _args: &Args<'_>,
    ctx: &mut CmdContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let _ = writeln!(out, "Resetting system...");
    ctx.board.reset();
    Ok(())
}

fn cmd_mem_dump(
    args: &Args<'_>,
    ctx: &mut CmdContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    if args.argc != 3 {
        let _ = writeln!(out, "Error: Invalid number of arguments. Usage: memd <#address> <#length>");
        return Err(ConsoleError::InvalidArgCount);
    }

    let Some(addr) = args.arg(1).and_then(parse_hex) else {
        let _ = writeln!(out, "Error: Invalid address format. Use hexadecimal with # prefix (e.g., #F0000000)");
        return Err(ConsoleError::InvalidValue);
    };
    let Some(length) = args.arg(2).and_then(parse_hex) else {
        let _ = writeln!(out, "Error: Invalid length format. Use hexadecimal with # prefix (e.g., #10)");
        return Err(ConsoleError::InvalidValue);
    };

    let start_time = ctx.timer.now_us();

    let _ = write!(out, "Address  ");
    for i in 0..16 {
        let _ = write!(out, "{:02X} ", i);
    }
    let _ = writeln!(out, "| ASCII");
    let _ = write!(out, "-------- ");
    for _ in 0..16 {
        let _ = write!(out, "---");
    }
    let _ = writeln!(out, "| ------");

    // Per-row bookkeeping stays in range even when the requested length
    // covers nearly the whole 32-bit space.
    let mut row_addr = addr;
    let mut remaining = length;
    while remaining > 0 {
        let row_len = remaining.min(16);
        let _ = write!(out, "{:08X}: ", row_addr);

        for i in 0..16 {
            if i < row_len {
                let data = ctx.board.mem_read8(row_addr.wrapping_add(i));
                let _ = write!(out, "{:02X} ", data);
            } else {
                let _ = write!(out, "   ");
            }
        }

        let _ = write!(out, "| ");
        for i in 0..16 {
            if i < row_len {
                let data = ctx.board.mem_read8(row_addr.wrapping_add(i));
                let c = if (32..=126).contains(&data) { data as char } else { '.' };
                let _ = write!(out, "{}", c);
            } else {
                let _ = write!(out, " ");
            }
        }
        let _ = writeln!(out);

        remaining -= row_len;
        row_addr = row_addr.wrapping_add(16);
    }

    let end_time = ctx.timer.now_us();
    let _ = writeln!(out, "\nMemory dump completed (proc time: {} us)", end_time - start_time);
    Ok(())
}

fn cmd_reg(
    args: &Args<'_>,
    ctx: &mut CmdContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    if args.argc != 4 && args.argc != 5 {
        let _ = writeln!(out, "Error: Usage: reg #ADDR r|w BITS [#VAL]");
        let _ = writeln!(out, "  e.g. reg #F000FF00 r 8");
        let _ = writeln!(out, "  e.g. reg #F000FF00 w 32 #FFDC008F");
        return Err(ConsoleError::InvalidArgCount);
    }

    let Some(addr) = args.arg(1).and_then(parse_hex) else {
        let _ = writeln!(out, "Error: Invalid address format. Use #HEX (e.g. #F000FF00)");
        return Err(ConsoleError::InvalidValue);
    };

    let rw = args.arg(2).and_then(|s| s.chars().next()).unwrap_or('\0');
    let bits = parse_dec(args.arg(3).unwrap_or(""));
    if !(bits == 8 || bits == 16 || bits == 32) {
        let _ = writeln!(out, "Error: Bit width must be 8, 16, or 32");
        return Err(ConsoleError::OutOfRange);
    }
    let width = (bits / 4) as usize;

    match rw {
        'r' => {
            if args.argc != 4 {
                let _ = writeln!(out, "Error: Read usage: reg #ADDR r BITS");
                return Err(ConsoleError::InvalidArgCount);
            }
            let val = match bits {
                8 => ctx.board.mem_read8(addr) as u32,
                16 => ctx.board.mem_read16(addr) as u32,
                _ => ctx.board.mem_read32(addr),
            };
            let _ = writeln!(out, "[REG] Read {}bit @ 0x{:08X} = 0x{:0w$X}", bits, addr, val, w = width);
            Ok(())
        }
        'w' => {
            if args.argc != 5 {
                let _ = writeln!(out, "Error: Write usage: reg #ADDR w BITS #VAL");
                return Err(ConsoleError::InvalidArgCount);
            }
            let Some(wval) = args.arg(4).and_then(parse_hex) else {
                let _ = writeln!(out, "Error: Invalid value format. Use #HEX (e.g. #FFDC008F)");
                return Err(ConsoleError::InvalidValue);
            };
            match bits {
                8 => ctx.board.mem_write8(addr, wval as u8),
                16 => ctx.board.mem_write16(addr, wval as u16),
                _ => ctx.board.mem_write32(addr, wval),
            }
            let _ = writeln!(out, "[REG] Write {}bit @ 0x{:08X} = 0x{:0w$X}", bits, addr, wval, w = width);
            Ok(())
        }
        _ => {
            let _ = writeln!(out, "Error: 2nd arg must be 'r' or 'w'");
            Err(ConsoleError::InvalidValue)
        }
    }
}

fn cmd_i2c(
    args: &Args<'_>,
    ctx: &mut CmdContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    if args.argc != 3 {
        let _ = writeln!(out, "Error: Invalid number of arguments. Usage: i2c <port> <command>");
        let _ = writeln!(out, "Commands:");
        let _ = writeln!(out, "  s - Scan I2C bus for devices");
        return Err(ConsoleError::InvalidArgCount);
    }

    let port = parse_dec(args.arg(1).unwrap_or(""));
    if port != 0 && port != 1 {
        let _ = writeln!(out, "Error: Only I2C ports 0 and 1 are supported.");
        return Err(ConsoleError::OutOfRange);
    }

    match args.arg(2) {
        Some("s") => {
            let _ = writeln!(out, "Scanning I2C port {} ...", port);
            let mut found = 0u32;
            // 7-bit address space minus the reserved ranges.
            for addr in 0x08u8..=0x77 {
                if ctx.board.i2c_probe(port as u8, addr) {
                    let _ = writeln!(out, "  Found device at 0x{:02X}", addr);
                    found += 1;
                }
            }
            let _ = writeln!(out, "{} device(s) found", found);
            Ok(())
        }
        Some(cmd) => {
            let _ = writeln!(out, "Error: Unknown I2C command '{}'", cmd);
            Err(ConsoleError::InvalidValue)
        }
        None => Err(ConsoleError::InvalidArgCount),
    }
}

fn cmd_gpio(
    args: &Args<'_>,
    ctx: &mut CmdContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    if args.argc != 3 {
        let _ = writeln!(out, "Error: Invalid number of arguments. Usage: gpio <pin> <value>\n");
        return Err(ConsoleError::InvalidArgCount);
    }

    let pin = parse_dec(args.arg(1).unwrap_or(""));
    let value = parse_dec(args.arg(2).unwrap_or(""));

    if pin < 0 || pin > GPIO_MAX_PIN as i32 {
        let _ = writeln!(out, "Error: Invalid GPIO pin number. Must be between 0 and {}.\n", GPIO_MAX_PIN);
        return Err(ConsoleError::OutOfRange);
    }
    if value != 0 && value != 1 {
        let _ = writeln!(out, "Error: Invalid GPIO value. Must be 0 or 1.\n");
        return Err(ConsoleError::InvalidValue);
    }

    let start_time = ctx.timer.now_us();
    ctx.board.gpio_write(pin as u8, value == 1);
    let end_time = ctx.timer.now_us();

    let _ = writeln!(out, "GPIO {} set to {} (proc time: {} us)\n", pin, value, end_time - start_time);
    Ok(())
}

/// Named colors accepted by `px` (case-insensitive).
static NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("red", (255, 0, 0)),
    ("green", (0, 255, 0)),
    ("blue", (0, 0, 255)),
    ("yellow", (255, 255, 0)),
    ("cyan", (0, 255, 255)),
    ("magenta", (255, 0, 255)),
    ("orange", (255, 165, 0)),
    ("purple", (128, 0, 128)),
    ("pink", (255, 192, 203)),
    ("white", (255, 255, 255)),
];

fn color_from_name(name: &str) -> Option<(u8, u8, u8)> {
    NAMED_COLORS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, rgb)| rgb)
}

fn cmd_pixel(
    args: &Args<'_>,
    ctx: &mut CmdContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let Some(mode) = args.arg(1) else {
        let _ = writeln!(out, "Usage: px <index|all|cls|fade> [<color>|#RRGGBB]");
        return Err(ConsoleError::InvalidArgCount);
    };

    if mode.eq_ignore_ascii_case("cls") {
        ctx.board.pixel_clear();
        ctx.board.pixel_show();
        let _ = writeln!(out, "All NeoPixel Cleared!");
        return Ok(());
    }

    if mode.eq_ignore_ascii_case("fade") {
        // The fade effect runs on the peer core.
        ctx.mailbox.send(PROC_NEOPIXEL_FADE);
        let _ = writeln!(out, "All NeoPixel Color Fade! at Core 0");
        return Ok(());
    }

    let Some(color_str) = args.arg(2) else {
        let _ = writeln!(out, "Usage: px <index|all> <color|#RRGGBB>");
        return Err(ConsoleError::InvalidArgCount);
    };

    let all = mode.eq_ignore_ascii_case("all");
    let count = ctx.board.pixel_count();
    let idx = parse_dec(mode);
    if !all && (idx < 1 || idx > count as i32) {
        let _ = writeln!(out, "Error: index must be 1-{}", count);
        return Err(ConsoleError::OutOfRange);
    }
    let led_idx = (idx - 1).max(0) as usize;

    if let Some((r, g, b)) = color_from_name(color_str) {
        if all {
            ctx.board.pixel_set_all(r, g, b);
            ctx.board.pixel_show();
            let _ = writeln!(out, "All NeoPixels set to {}", color_str);
        } else {
            ctx.board.pixel_set(led_idx, r, g, b);
            ctx.board.pixel_show();
            let _ = writeln!(out, "NeoPixel[{}] = {}", led_idx, color_str);
        }
        return Ok(());
    }

    if let Some((r, g, b)) = parse_hex_color(color_str) {
        if all {
            ctx.board.pixel_set_all(r, g, b);
            ctx.board.pixel_show();
            let _ = writeln!(out, "All NeoPixels set to #{:02X}{:02X}{:02X}", r, g, b);
        } else {
            ctx.board.pixel_set(led_idx, r, g, b);
            ctx.board.pixel_show();
            let _ = writeln!(out, "NeoPixel[{}] = #{:02X}{:02X}{:02X}", led_idx, r, g, b);
        }
        return Ok(());
    }

    let _ = writeln!(out, "Error: Unknown color '{}'", color_str);
    Err(ConsoleError::InvalidValue)
}

fn cmd_timer(
    args: &Args<'_>,
    ctx: &mut CmdContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    if let Some(arg) = args.arg(1) {
        let seconds = parse_dec(arg);
        return match ctx.alarms.allocate(seconds, ctx.timer) {
            Ok(slot_no) => {
                let _ = writeln!(out, "Timer #{} Alarm Set {} s", slot_no, seconds);
                Ok(())
            }
            Err(e) => {
                let _ = writeln!(out, "{}", e);
                Err(match e {
                    AlarmError::Exhausted => ConsoleError::TimersExhausted,
                    AlarmError::ScheduleFailed => ConsoleError::HardwareFault,
                    _ => ConsoleError::OutOfRange,
                })
            }
        };
    }

    // No argument: report running timers.
    let statuses = ctx.alarms.status(ctx.timer.now_us());
    let mut any_running = false;
    for (i, status) in statuses.iter().enumerate() {
        if let Some(s) = status {
            let _ = writeln!(out, "Timer alarm #{} = {} s remaining.", i + 1, s.remaining_s);
            any_running = true;
        }
    }
    if !any_running {
        let _ = writeln!(out, "No timers are running.");
    }
    Ok(())
}

fn cmd_rnd(
    args: &Args<'_>,
    ctx: &mut CmdContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    if args.argc != 2 {
        let _ = writeln!(out, "Usage: rnd <count>");
        return Err(ConsoleError::InvalidArgCount);
    }

    let count = parse_dec(args.arg(1).unwrap_or(""));
    if count <= 0 {
        let _ = writeln!(out, "Error: Invalid count. Must be positive.");
        return Err(ConsoleError::OutOfRange);
    }
    if count > RND_MAX_COUNT {
        let _ = writeln!(out, "Error: Count exceeds maximum of {}.", RND_MAX_COUNT);
        return Err(ConsoleError::OutOfRange);
    }

    let _ = writeln!(out, "\nTRNG gen random num cnt:{}", count);
    for i in 0..count {
        let _ = writeln!(out, "rand num({}) : {}", i, ctx.board.trng_u32());
    }
    Ok(())
}

fn cmd_sha(
    args: &Args<'_>,
    ctx: &mut CmdContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    if args.argc != 2 {
        let _ = writeln!(out, "Usage: sha <text>");
        return Err(ConsoleError::InvalidArgCount);
    }
    let msg = args.arg(1).unwrap_or("");

    let _ = writeln!(out, "\nSHA-256 Hash Calc(H/W)");
    let _ = writeln!(out, "Calc str : {}", msg);

    let hash = ctx.board.sha256(msg.as_bytes());
    let _ = write!(out, "SHA-256 Hash : ");
    for b in hash {
        let _ = write!(out, "{:02X}", b);
    }
    let _ = writeln!(out);
    Ok(())
}

fn cmd_mt(
    _args: &Args<'_>,
    ctx: &mut CmdContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    mathtest::run(ctx.timer, out);
    Ok(())
}

fn cmd_mct(
    _args: &Args<'_>,
    ctx: &mut CmdContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let data = MULTI_CORE_TEST_DATA;
    ctx.mailbox.send(data);
    let _ = writeln!(out, "[Core 1] TX FIFO Data to Core 0 : 0x{:08X}", data);
    Ok(())
}
