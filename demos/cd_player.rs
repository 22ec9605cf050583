//! CD Player
//!
//! A flat machine driven by a scripted sequence of button presses.
//!
//! Key concepts:
//! - Bindings keyed by (state, trigger)
//! - Application state kept in the machine context
//! - Trigger arguments (the track number)
//! - Verbose and warning hooks
//!
//! Run with: cargo run --example cd_player

use statestack::builder::MachineBuilder;
use statestack::states;
use tracing_subscriber::EnvFilter;

states! {
    OPENING = "opening",
    CLOSING = "closing",
    WAITING = "waiting",
    PLAYING = "playing",

    OPEN = "open",
    CLOSE = "close",
    PLAY = "play",
    STOP = "stop",
    INSERT = "insert",
    EJECT = "eject",
}

#[derive(Default)]
struct Player {
    has_cd: bool,
}

fn good_disk_format() -> bool {
    true
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut cd = MachineBuilder::<Player>::new()
        .initial(OPENING)
        .on_verbose(|line| println!("  {line}"))
        .on_warning(|line| println!("  ! {line}"))
        .on(&OPENING, &CLOSE, |m, _| {
            println!("closing tray");
            if m.context().has_cd {
                println!("retrieving CD info");
                m.start(WAITING);
            } else {
                m.start(CLOSING);
            }
        })
        .on(&OPENING, &INSERT, |m, _| {
            m.context_mut().has_cd = true;
            m.start(OPENING);
        })
        .on(&OPENING, &EJECT, |m, _| {
            m.context_mut().has_cd = false;
            m.start(OPENING);
        })
        .on(&CLOSING, &OPEN, |m, _| {
            println!("opening tray");
            m.start(OPENING);
        })
        .on(&WAITING, &PLAY, |m, args| {
            if !good_disk_format() {
                m.start(WAITING);
                return;
            }
            let track = args.first().map(String::as_str).unwrap_or("1");
            println!("playing track #{track}");
            m.start(PLAYING);
        })
        .on(&WAITING, &OPEN, |m, _| {
            println!("opening tray");
            m.start(OPENING);
        })
        .on(&PLAYING, &OPEN, |m, _| {
            println!("opening tray");
            m.start(OPENING);
        })
        .on(&PLAYING, &STOP, |m, _| m.start(WAITING))
        .build()
        .expect("cd player bindings are valid");

    let presses = [
        PLAY.bare(),
        INSERT.bare(),
        CLOSE.bare(),
        PLAY.with_arg(4),
        STOP.bare(),
        OPEN.bare(),
        EJECT.bare(),
        CLOSE.bare(),
    ];

    for press in presses {
        println!("[{}] {}", cd.top().map(ToString::to_string).unwrap_or_default(), press);
        cd.command(press);
    }

    println!();
    print!("{}", cd.debug());
}
