//! Guard Patrol
//!
//! Game AI expressed as nested modes. The guard patrols; hearing a noise
//! pushes an investigation mode, spotting the player pushes a chase mode on
//! top of that. An `alarm` is only understood by the outermost mode, so
//! raising it retires every nested mode at once; the guard then locks down.
//!
//! Key concepts:
//! - push/pop for nested modes
//! - Bubbling to the nearest ancestor that understands a trigger
//! - Lifecycle verbs (init, quit, push, back)
//!
//! Run with: cargo run --example guard_patrol

use statestack::builder::{pop_back, push_to, MachineBuilder};
use statestack::core::Lifecycle;
use statestack::states;

states! {
    PATROL = "patrol",
    INVESTIGATE = "investigate",
    CHASE = "chase",
    LOCKDOWN = "lockdown",

    NOISE = "noise",
    SPOTTED = "spotted",
    LOST = "lost",
    ALL_CLEAR = "all-clear",
    ALARM = "alarm",
}

#[derive(Default)]
struct Guard {
    waypoint: usize,
    alarmed: bool,
}

fn main() {
    let mut guard = MachineBuilder::<Guard>::new()
        .initial(PATROL)
        .on(&PATROL, Lifecycle::Init, |_, _| println!("guard starts patrolling"))
        .on(&PATROL, Lifecycle::Push, |m, _| {
            println!("patrol paused at waypoint {}", m.context().waypoint)
        })
        .on(&PATROL, Lifecycle::Back, |m, _| {
            m.context_mut().waypoint += 1;
            println!("patrol resumed towards waypoint {}", m.context().waypoint);
        })
        .on(&PATROL, &NOISE, push_to(INVESTIGATE))
        .on(&PATROL, &ALARM, |m, _| m.context_mut().alarmed = true)
        .on(&INVESTIGATE, Lifecycle::Init, |_, args| {
            println!("investigating noise near {}", args.join(" "))
        })
        .on(&INVESTIGATE, Lifecycle::Quit, |_, _| println!("investigation over"))
        .on(&INVESTIGATE, &SPOTTED, push_to(CHASE))
        .on(&INVESTIGATE, &ALL_CLEAR, pop_back())
        .on(&CHASE, Lifecycle::Init, |_, _| println!("chasing the player"))
        .on(&CHASE, Lifecycle::Quit, |_, _| println!("chase abandoned"))
        .on(&CHASE, &LOST, pop_back())
        .on(&LOCKDOWN, Lifecycle::Init, |_, _| println!("lockdown engaged"))
        .build()
        .expect("guard bindings are valid");

    guard.command_with(NOISE, ["crates", "by", "the", "dock"]);
    guard.command(SPOTTED);
    guard.command(LOST);
    guard.command(ALL_CLEAR);
    guard.command(NOISE.with_arg("vent"));
    guard.command(SPOTTED);

    // nobody above patrol knows about alarms; chase and investigate are retired
    guard.command(ALARM);
    if guard.context().alarmed {
        guard.start(LOCKDOWN);
    }

    println!();
    print!("{}", guard.debug());
}
