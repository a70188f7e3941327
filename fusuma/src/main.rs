mod app;
mod core;
mod effect;
mod event;
mod ipc;
mod platform;
mod x11;

use anyhow::{bail, Context, Result};
use argh::FromArgs;
use fusuma_ipc::{Action, Command, Response};
use ipc::IpcClient;
use nix::sys::signal::{signal, SigHandler, Signal};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fusuma - dynamic tiling window manager for X11
#[derive(FromArgs)]
struct Cli {
    #[argh(subcommand)]
    command: Option<SubCommand>,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum SubCommand {
    Start(StartCmd),
    Version(VersionCmd),
    Spawn(SpawnCmd),
    SigStatusBar(SigStatusBarCmd),
    FocusStack(FocusStackCmd),
    Zoom(ZoomCmd),
    KillClient(KillClientCmd),
    ToggleFloating(ToggleFloatingCmd),
    MoveMouse(MoveMouseCmd),
    ResizeMouse(ResizeMouseCmd),
    View(ViewCmd),
    ToggleView(ToggleViewCmd),
    Tag(TagCmd),
    ToggleTag(ToggleTagCmd),
    SetLayout(SetLayoutCmd),
    IncNMaster(IncNMasterCmd),
    SetMFact(SetMFactCmd),
    SetGaps(SetGapsCmd),
    ToggleBar(ToggleBarCmd),
    FocusMon(FocusMonCmd),
    TagMon(TagMonCmd),
    Quit(QuitCmd),
    ListWindows(ListWindowsCmd),
    ListMonitors(ListMonitorsCmd),
    GetState(GetStateCmd),
    ListBindings(ListBindingsCmd),
}

/// Start the window manager on $DISPLAY
#[derive(FromArgs)]
#[argh(subcommand, name = "start")]
struct StartCmd {}

/// Show version information
#[derive(FromArgs)]
#[argh(subcommand, name = "version")]
struct VersionCmd {}

/// Run a program ({mon} expands to the selected monitor)
#[derive(FromArgs)]
#[argh(subcommand, name = "spawn")]
struct SpawnCmd {
    /// program and arguments
    #[argh(positional, greedy)]
    argv: Vec<String>,
}

/// Signal the status bar process as if its text was clicked
#[derive(FromArgs)]
#[argh(subcommand, name = "sigstatusbar")]
struct SigStatusBarCmd {
    /// pointer button (1-5)
    #[argh(positional)]
    button: i32,
}

/// Move focus through the stack (use -- before negative values)
#[derive(FromArgs)]
#[argh(subcommand, name = "focus-stack")]
struct FocusStackCmd {
    /// +1 for next, -1 for previous
    #[argh(positional)]
    delta: i32,
}

/// Swap the focused window with the master
#[derive(FromArgs)]
#[argh(subcommand, name = "zoom")]
struct ZoomCmd {}

/// Close the focused window
#[derive(FromArgs)]
#[argh(subcommand, name = "kill-client")]
struct KillClientCmd {}

/// Toggle floating on the focused window
#[derive(FromArgs)]
#[argh(subcommand, name = "toggle-floating")]
struct ToggleFloatingCmd {}

/// Move the focused window with the pointer
#[derive(FromArgs)]
#[argh(subcommand, name = "move-mouse")]
struct MoveMouseCmd {}

/// Resize the focused window with the pointer
#[derive(FromArgs)]
#[argh(subcommand, name = "resize-mouse")]
struct ResizeMouseCmd {}

/// Show the given tags
#[derive(FromArgs)]
#[argh(subcommand, name = "view")]
struct ViewCmd {
    /// every tag
    #[argh(switch)]
    all: bool,
    /// tag numbers (1-32)
    #[argh(positional)]
    tags: Vec<u32>,
}

/// Toggle visibility of the given tags
#[derive(FromArgs)]
#[argh(subcommand, name = "toggle-view")]
struct ToggleViewCmd {
    /// every tag
    #[argh(switch)]
    all: bool,
    /// tag numbers (1-32)
    #[argh(positional)]
    tags: Vec<u32>,
}

/// Move the focused window to the given tags
#[derive(FromArgs)]
#[argh(subcommand, name = "tag")]
struct TagCmd {
    /// every tag
    #[argh(switch)]
    all: bool,
    /// tag numbers (1-32)
    #[argh(positional)]
    tags: Vec<u32>,
}

/// Toggle the given tags on the focused window
#[derive(FromArgs)]
#[argh(subcommand, name = "toggle-tag")]
struct ToggleTagCmd {
    /// every tag
    #[argh(switch)]
    all: bool,
    /// tag numbers (1-32)
    #[argh(positional)]
    tags: Vec<u32>,
}

/// Select a layout by index, or swap back to the previous one
#[derive(FromArgs)]
#[argh(subcommand, name = "set-layout")]
struct SetLayoutCmd {
    /// layout index
    #[argh(positional)]
    index: Option<usize>,
}

/// Change the number of master windows
#[derive(FromArgs)]
#[argh(subcommand, name = "inc-nmaster")]
struct IncNMasterCmd {
    /// amount to add
    #[argh(positional)]
    delta: i32,
}

/// Change the master area factor
#[derive(FromArgs)]
#[argh(subcommand, name = "set-mfact")]
struct SetMFactCmd {
    /// amount to add
    #[argh(positional)]
    delta: f32,
}

/// Change the gap size (0 restores the default)
#[derive(FromArgs)]
#[argh(subcommand, name = "set-gaps")]
struct SetGapsCmd {
    /// amount to add in pixels
    #[argh(positional)]
    delta: i32,
}

/// Show or hide the bar
#[derive(FromArgs)]
#[argh(subcommand, name = "toggle-bar")]
struct ToggleBarCmd {}

/// Focus the next or previous monitor
#[derive(FromArgs)]
#[argh(subcommand, name = "focus-mon")]
struct FocusMonCmd {
    /// +1 for next, -1 for previous
    #[argh(positional)]
    delta: i32,
}

/// Send the focused window to the next or previous monitor
#[derive(FromArgs)]
#[argh(subcommand, name = "tag-mon")]
struct TagMonCmd {
    /// +1 for next, -1 for previous
    #[argh(positional)]
    delta: i32,
}

/// Quit the window manager
#[derive(FromArgs)]
#[argh(subcommand, name = "quit")]
struct QuitCmd {}

/// List all managed windows
#[derive(FromArgs)]
#[argh(subcommand, name = "list-windows")]
struct ListWindowsCmd {}

/// List monitors
#[derive(FromArgs)]
#[argh(subcommand, name = "list-monitors")]
struct ListMonitorsCmd {}

/// Get current window manager state
#[derive(FromArgs)]
#[argh(subcommand, name = "get-state")]
struct GetStateCmd {}

/// List key and button bindings
#[derive(FromArgs)]
#[argh(subcommand, name = "list-bindings")]
struct ListBindingsCmd {}

fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    match cli.command {
        None => {
            // No subcommand - show help (simulate --help)
            let args: Vec<&str> = vec!["fusuma", "--help"];
            if let Err(e) = Cli::from_args(&args[..1], &args[1..]) {
                println!("{}", e.output);
            }
            Ok(())
        }
        Some(SubCommand::Start(_)) => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .init();

            // children are never waited for
            // SAFETY: no handler runs, the disposition is only set to ignore
            unsafe { signal(Signal::SIGCHLD, SigHandler::SigIgn) }
                .context("Failed to ignore SIGCHLD")?;

            tracing::info!("fusuma {} starting", VERSION);
            let config = core::Config::load()?;
            app::App::run(config)
        }
        Some(SubCommand::Version(_)) => {
            println!("fusuma {}", VERSION);
            Ok(())
        }
        Some(subcmd) => run_cli(subcmd),
    }
}

fn run_cli(subcmd: SubCommand) -> Result<()> {
    let cmd = to_command(subcmd)?;
    let mut client = IpcClient::connect()?;
    let response = client.send(&cmd)?;

    match response {
        Response::Ok => {}
        Response::Error { message } => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
        Response::Windows { windows } => {
            for w in windows {
                println!(
                    "{}: {} ({}) - {} [mon={}, tags={:#x}, {}x{} @ ({},{})]{}{}",
                    w.id,
                    w.class,
                    w.instance,
                    w.title,
                    w.monitor,
                    w.tags,
                    w.width,
                    w.height,
                    w.x,
                    w.y,
                    if w.is_floating { " floating" } else { "" },
                    if w.is_focused { " *" } else { "" }
                );
            }
        }
        Response::Monitors { monitors } => {
            for m in monitors {
                println!(
                    "{}: {}x{} @ ({},{}) tags={:#x} {} nmaster={} mfact={:.2} gap={}{}",
                    m.index,
                    m.width,
                    m.height,
                    m.x,
                    m.y,
                    m.visible_tags,
                    m.layout,
                    m.nmaster,
                    m.mfact,
                    m.gap,
                    if m.is_selected { " *" } else { "" }
                );
            }
        }
        Response::State { state } => {
            println!("Visible tags: {:#x}", state.visible_tags);
            println!("Focused window: {:?}", state.focused_window_id);
            println!("Selected monitor: {}", state.selected_monitor);
            println!("Layout: {}", state.layout);
            println!("Window count: {}", state.window_count);
        }
        Response::Bindings { bindings } => {
            for b in bindings {
                println!("{} -> {}", b.trigger, b.action);
            }
        }
    }

    Ok(())
}

/// Tag numbers (1-32) to a mask.
fn tag_mask(tags: &[u32], all: bool) -> Result<u32> {
    if all {
        return Ok(u32::MAX);
    }
    if tags.is_empty() {
        bail!("No tags given (use tag numbers 1-32 or --all)");
    }
    tags.iter().try_fold(0u32, |mask, &tag| {
        if !(1..=32).contains(&tag) {
            bail!("Tag {} out of range (1-32)", tag);
        }
        Ok(mask | 1 << (tag - 1))
    })
}

fn to_command(subcmd: SubCommand) -> Result<Command> {
    let action = match subcmd {
        SubCommand::Start(_) | SubCommand::Version(_) => {
            unreachable!("handled in main")
        }
        SubCommand::ListWindows(_) => return Ok(Command::ListWindows),
        SubCommand::ListMonitors(_) => return Ok(Command::ListMonitors),
        SubCommand::GetState(_) => return Ok(Command::GetState),
        SubCommand::ListBindings(_) => return Ok(Command::ListBindings),
        SubCommand::Spawn(cmd) => {
            if cmd.argv.is_empty() {
                bail!("spawn requires a program");
            }
            Action::Spawn { argv: cmd.argv }
        }
        SubCommand::SigStatusBar(cmd) => Action::SignalStatusBar { button: cmd.button },
        SubCommand::FocusStack(cmd) => Action::FocusStack { delta: cmd.delta },
        SubCommand::Zoom(_) => Action::Zoom,
        SubCommand::KillClient(_) => Action::KillClient,
        SubCommand::ToggleFloating(_) => Action::ToggleFloating,
        SubCommand::MoveMouse(_) => Action::MoveMouse,
        SubCommand::ResizeMouse(_) => Action::ResizeMouse,
        SubCommand::View(cmd) => Action::View {
            tags: tag_mask(&cmd.tags, cmd.all)?,
        },
        SubCommand::ToggleView(cmd) => Action::ToggleView {
            tags: tag_mask(&cmd.tags, cmd.all)?,
        },
        SubCommand::Tag(cmd) => Action::Tag {
            tags: tag_mask(&cmd.tags, cmd.all)?,
        },
        SubCommand::ToggleTag(cmd) => Action::ToggleTag {
            tags: tag_mask(&cmd.tags, cmd.all)?,
        },
        SubCommand::SetLayout(cmd) => Action::SetLayout { index: cmd.index },
        SubCommand::IncNMaster(cmd) => Action::IncNMaster { delta: cmd.delta },
        SubCommand::SetMFact(cmd) => Action::SetMFact { delta: cmd.delta },
        SubCommand::SetGaps(cmd) => Action::SetGaps { delta: cmd.delta },
        SubCommand::ToggleBar(_) => Action::ToggleBar,
        SubCommand::FocusMon(cmd) => Action::FocusMon { delta: cmd.delta },
        SubCommand::TagMon(cmd) => Action::TagMon { delta: cmd.delta },
        SubCommand::Quit(_) => Action::Quit,
    };
    Ok(Command::Run { action })
}
