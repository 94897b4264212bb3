/// Game-logic functions.
///
/// `tick` advances a `GameState` in place by one frame and reports the
/// notable things that happened as `GameEvent`s.  All randomness comes
/// through an injected RNG and all time through `now_ms`, so callers control
/// determinism (tests use a seeded RNG and fixed timestamps).

use rand::Rng;
use tracing::{debug, info};

use crate::entities::{
    Body, Bullet, Enemy, EnemyKind, GameEvent, GameState, GameStatus, Player, BULLET_DAMAGE,
    BULLET_HEIGHT, BULLET_SPEED, BULLET_WIDTH, COLLISION_DAMAGE, FIELD_HEIGHT, FIELD_WIDTH,
    FIRE_RATE_MS, PLAYER_MAX_HEALTH, PLAYER_SIZE, PLAYER_SPEED, PLAYER_START_MARGIN,
    POINTS_PER_LEVEL,
};
use crate::input::{Control, HeldKeys};

// ── Difficulty tables ────────────────────────────────────────────────────────

/// Level derived from score: one level per 1000 points, starting at 1.
pub fn level_for_score(score: u32) -> u32 {
    score / POINTS_PER_LEVEL + 1
}

/// Per-tick probability of spawning an enemy.
pub fn spawn_chance(level: u32) -> f64 {
    0.02 + level as f64 * 0.005
}

/// Weighted kind selection: 70% scout, 20% interceptor, 10% bomber.
pub fn enemy_kind_for_roll(roll: f64) -> EnemyKind {
    if roll > 0.9 {
        EnemyKind::Bomber
    } else if roll > 0.7 {
        EnemyKind::Interceptor
    } else {
        EnemyKind::Scout
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// A fresh player parked at the bottom centre of the field.
pub fn init_player() -> Player {
    Player {
        body: Body {
            x: FIELD_WIDTH / 2.0 - PLAYER_SIZE / 2.0,
            y: FIELD_HEIGHT - PLAYER_SIZE - PLAYER_START_MARGIN,
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
            speed: PLAYER_SPEED,
        },
        health: PLAYER_MAX_HEALTH,
        max_health: PLAYER_MAX_HEALTH,
        score: 0,
        bullets: Vec::new(),
        last_shot: None,
    }
}

/// Build the initial game state in the given status.
pub fn init_state(status: GameStatus) -> GameState {
    GameState {
        player: init_player(),
        enemies: Vec::new(),
        status,
        level: 1,
        width: FIELD_WIDTH,
        height: FIELD_HEIGHT,
    }
}

/// A new enemy just above the top edge at a random horizontal offset.
pub fn spawn_enemy(width: f32, rng: &mut impl Rng) -> Enemy {
    let kind = enemy_kind_for_roll(rng.gen::<f64>());
    let spec = kind.spec();
    let x = rng.gen::<f32>() * (width - spec.width).max(0.0);
    Enemy {
        body: Body {
            x,
            y: -spec.height,
            width: spec.width,
            height: spec.height,
            speed: spec.speed,
        },
        kind,
        health: spec.health,
        color: spec.color,
    }
}

// ── Per-frame phases ──────────────────────────────────────────────────────────

/// Shift the player along each held direction whose result stays in bounds.
/// Axes are independent, so diagonals travel `speed` on both.
pub fn move_player(player: &mut Player, held: &HeldKeys, width: f32, height: f32) {
    let body = &mut player.body;
    if held.is_held(Control::Left) && body.x - body.speed >= 0.0 {
        body.x -= body.speed;
    }
    if held.is_held(Control::Right) && body.x + body.speed <= width - body.width {
        body.x += body.speed;
    }
    if held.is_held(Control::Up) && body.y - body.speed >= 0.0 {
        body.y -= body.speed;
    }
    if held.is_held(Control::Down) && body.y + body.speed <= height - body.height {
        body.y += body.speed;
    }
}

/// Fire one bullet from the player's nose if the fire interval has elapsed.
/// Returns whether a bullet was created.
pub fn player_shoot(player: &mut Player, now_ms: u64) -> bool {
    let ready = match player.last_shot {
        None => true,
        Some(last) => now_ms.saturating_sub(last) > FIRE_RATE_MS,
    };
    if !ready {
        return false;
    }
    player.bullets.push(Bullet {
        body: Body {
            x: player.body.x + player.body.width / 2.0 - BULLET_WIDTH / 2.0,
            y: player.body.y,
            width: BULLET_WIDTH,
            height: BULLET_HEIGHT,
            speed: BULLET_SPEED,
        },
        damage: BULLET_DAMAGE,
    });
    player.last_shot = Some(now_ms);
    true
}

/// Move every bullet up and drop those fully above the field.
pub fn advance_bullets(bullets: &mut Vec<Bullet>) {
    bullets.retain_mut(|b| {
        b.body.y -= b.body.speed;
        b.body.y > -b.body.height
    });
}

/// Move enemies down and resolve bullet and ramming collisions.
///
/// Enemies are processed in order.  A bullet is consumed by the first enemy
/// it overlaps; an enemy killed by bullets never rams the player that tick.
pub fn resolve_enemies(
    player: &mut Player,
    enemies: &mut Vec<Enemy>,
    height: f32,
    events: &mut Vec<GameEvent>,
) {
    enemies.retain_mut(|enemy| {
        enemy.body.y += enemy.body.speed;

        player.bullets.retain(|bullet| {
            if bullet.body.overlaps(&enemy.body) {
                enemy.health -= bullet.damage;
                false
            } else {
                true
            }
        });

        if enemy.health <= 0 {
            player.score += enemy.kind.spec().score;
            debug!(kind = ?enemy.kind, score = player.score, "enemy destroyed");
            return false;
        }

        if player.body.overlaps(&enemy.body) {
            player.health -= COLLISION_DAMAGE;
            events.push(GameEvent::Collision {
                score: player.score,
                health: player.health,
            });
            return false;
        }

        enemy.body.y < height
    });
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.  Does nothing unless playing.
pub fn tick(
    state: &mut GameState,
    held: &HeldKeys,
    now_ms: u64,
    rng: &mut impl Rng,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !state.status.is_playing() {
        return events;
    }

    let GameState {
        player,
        enemies,
        width,
        height,
        ..
    } = &mut *state;

    // ── 1. Movement ──────────────────────────────────────────────────────────
    move_player(player, held, *width, *height);

    // ── 2. Firing ────────────────────────────────────────────────────────────
    if held.is_held(Control::Fire) {
        player_shoot(player, now_ms);
    }

    // ── 3. Bullets ───────────────────────────────────────────────────────────
    advance_bullets(&mut player.bullets);

    // ── 4. Enemies & collisions ──────────────────────────────────────────────
    resolve_enemies(player, enemies, *height, &mut events);

    // ── 5. Level progression ─────────────────────────────────────────────────
    let level = level_for_score(state.player.score);
    if level > state.level {
        state.level = level;
        info!(level, score = state.player.score, "level up");
        events.push(GameEvent::LevelUp {
            level,
            score: state.player.score,
            health: state.player.health,
        });
    }

    // ── 6. Game over ─────────────────────────────────────────────────────────
    if state.player.health <= 0 {
        state.status = GameStatus::GameOver;
        info!(score = state.player.score, "player destroyed");
        events.push(GameEvent::Destroyed {
            score: state.player.score,
        });
    }

    // ── 7. Spawning ──────────────────────────────────────────────────────────
    if state.status.is_playing() && rng.gen::<f64>() < spawn_chance(state.level) {
        let enemy = spawn_enemy(state.width, rng);
        state.enemies.push(enemy);
    }

    events
}
