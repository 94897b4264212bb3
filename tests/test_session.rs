use sky_guardian::commander::{CommanderUpdate, LAUNCH_MESSAGE, STANDBY_MESSAGE};
use sky_guardian::compute::init_state;
use sky_guardian::entities::*;
use sky_guardian::input::{Control, HeldKeys};
use sky_guardian::session::Session;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn scout_on_player() -> Enemy {
    let spec = EnemyKind::Scout.spec();
    Enemy {
        body: Body {
            x: 380.0,
            y: 500.0,
            width: spec.width,
            height: spec.height,
            speed: spec.speed,
        },
        kind: EnemyKind::Scout,
        health: spec.health,
        color: spec.color,
    }
}

#[test]
fn new_session_is_in_menu() {
    let s = Session::new();
    assert_eq!(s.status(), GameStatus::Menu);
    assert_eq!(s.level(), 1);
    assert_eq!(s.commander.message, STANDBY_MESSAGE);
    assert_eq!(s.commander.status, CommanderStatus::Idle);
}

#[test]
fn start_enters_playing_and_announces() {
    let mut s = Session::new();
    assert!(s.start());
    assert_eq!(s.status(), GameStatus::Playing);
    assert_eq!(s.level(), 1);
    assert_eq!(s.commander.message, LAUNCH_MESSAGE);
    assert_eq!(s.commander.status, CommanderStatus::Talking);
}

#[test]
fn start_and_restart_only_from_their_states() {
    let mut s = Session::new();
    assert!(!s.restart());
    assert_eq!(s.status(), GameStatus::Menu);

    s.start();
    assert!(!s.start());
    assert!(!s.restart());
    assert_eq!(s.status(), GameStatus::Playing);
}

#[test]
fn menu_session_does_not_simulate() {
    let mut s = Session::new();
    let events = s.advance(&HeldKeys::new().with(Control::Left), 0, &mut seeded_rng());
    assert!(events.is_empty());
    assert_eq!(s.game, init_state(GameStatus::Menu));
}

#[test]
fn collision_is_forwarded_with_ticket() {
    let mut s = Session::new();
    s.start();
    s.game.enemies.push(scout_on_player());

    let forwarded = s.advance(&HeldKeys::new(), 0, &mut seeded_rng());

    assert_eq!(forwarded.len(), 1);
    let (ticket, event) = &forwarded[0];
    assert_eq!(*ticket, 1);
    assert_eq!(*event, GameEvent::Collision { score: 0, health: 80 });
    assert_eq!(s.commander.status, CommanderStatus::Thinking);
}

#[test]
fn destroyed_event_ends_session_until_restart() {
    let mut s = Session::new();
    s.start();
    s.game.player.health = 15;
    s.game.enemies.push(scout_on_player());

    let forwarded = s.advance(&HeldKeys::new(), 0, &mut seeded_rng());
    let events: Vec<_> = forwarded.iter().map(|(_, e)| e.clone()).collect();
    assert_eq!(
        events,
        vec![
            GameEvent::Collision { score: 0, health: -5 },
            GameEvent::Destroyed { score: 0 },
        ]
    );
    // Two events, two distinct tickets.
    assert_ne!(forwarded[0].0, forwarded[1].0);
    assert_eq!(s.status(), GameStatus::GameOver);

    for t in 1..50 {
        let more = s.advance(&HeldKeys::new().with(Control::Fire), t * 16, &mut seeded_rng());
        assert!(more.is_empty());
        assert_eq!(s.status(), GameStatus::GameOver);
    }
    assert!(!s.start());
    assert_eq!(s.status(), GameStatus::GameOver);
}

#[test]
fn restart_clears_everything() {
    let mut s = Session::new();
    s.start();
    s.game.player.score = 5_400;
    s.game.level = 6;
    s.game.player.health = 0;
    s.game.player.last_shot = Some(99);
    s.game.player.bullets.push(Bullet {
        body: Body {
            x: 10.0,
            y: 10.0,
            width: BULLET_WIDTH,
            height: BULLET_HEIGHT,
            speed: BULLET_SPEED,
        },
        damage: 1,
    });
    s.game.enemies.push(scout_on_player());
    s.game.status = GameStatus::GameOver;

    assert!(s.restart());

    assert_eq!(s.status(), GameStatus::Playing);
    assert_eq!(s.level(), 1);
    assert_eq!(s.game.player.score, 0);
    assert_eq!(s.game.player.health, PLAYER_MAX_HEALTH);
    assert_eq!(s.game.player.last_shot, None);
    assert!(s.game.player.bullets.is_empty());
    assert!(s.game.enemies.is_empty());
}

#[test]
fn stale_advice_after_restart_still_shows() {
    let mut s = Session::new();
    s.start();
    s.game.player.health = 10;
    s.game.enemies.push(scout_on_player());
    let forwarded = s.advance(&HeldKeys::new(), 0, &mut seeded_rng());
    let (ticket, _) = forwarded[0].clone();

    s.restart();
    s.apply(CommanderUpdate::Spoke {
        ticket,
        text: "Too late, pilot.".to_string(),
    });

    assert_eq!(s.commander.message, "Too late, pilot.");
    assert_eq!(s.commander.status, CommanderStatus::Talking);
    assert_eq!(s.status(), GameStatus::Playing);
}

#[test]
fn tickets_keep_counting_across_restart() {
    let mut s = Session::new();
    s.start();
    s.game.player.health = 10;
    s.game.enemies.push(scout_on_player());
    let before = s.advance(&HeldKeys::new(), 0, &mut seeded_rng());
    let last_before = before.iter().map(|(t, _)| *t).max().unwrap();

    assert!(s.restart());
    s.game.enemies.push(scout_on_player());
    let after = s.advance(&HeldKeys::new(), 0, &mut seeded_rng());

    assert_eq!(after.len(), 1);
    assert!(after[0].0 > last_before);
}
