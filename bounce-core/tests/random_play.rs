//! Random play fuzzing
//!
//! Throws random (often illegal) operations at games and checks the
//! invariants that must hold after every single call.

use bounce_core::{Direction, Game, Phase, Player, Size, DIMENSION};
use rand::prelude::*;
use rand::rngs::StdRng;

/// Pieces of a size wherever they are: grid, goals, hand, reserves.
fn pieces_of(game: &Game, size: Size) -> u8 {
    let in_hand = (game.picked_piece_size() == Some(size)) as u8;
    let to_place: u8 = Player::all().map(|p| game.nb_pieces_available(size, p)).sum();
    game.board().count(size) + in_hand + to_place
}

fn random_direction(rng: &mut StdRng) -> Direction {
    Direction::from_code(rng.random_range(0..5)).unwrap()
}

fn random_size(rng: &mut StdRng) -> Size {
    Size::from_value(rng.random_range(1..=3)).unwrap()
}

fn random_player(rng: &mut StdRng) -> Player {
    if rng.random_bool(0.5) {
        Player::South
    } else {
        Player::North
    }
}

/// Mostly on-board coordinates, sometimes off by a little.
fn random_coord(rng: &mut StdRng) -> i32 {
    rng.random_range(-1..=DIMENSION as i32)
}

fn random_setup(rng: &mut StdRng) -> Game {
    let mut game = Game::new();
    for player in Player::all() {
        let mut sizes: Vec<Size> = Size::all().flat_map(|s| [s, s]).collect();
        sizes.shuffle(rng);
        for (column, size) in sizes.into_iter().enumerate() {
            game.place_piece(size, player, column as i32).unwrap();
        }
    }
    game
}

/// Applies one random operation and checks the invariants around it.
fn random_step(game: &mut Game, rng: &mut StdRng) {
    let before = game.clone();
    let holder = game.picked_piece_owner();

    let result = match rng.random_range(0..10) {
        0 => game.place_piece(random_size(rng), random_player(rng), random_coord(rng)),
        1 | 2 => {
            let player = game.turn().filter(|_| rng.random_bool(0.8)).unwrap_or_else(|| random_player(rng));
            let line = match rng.random_bool(0.8) {
                true => game.board().closest_occupied_line(player).map_or(0, i32::from),
                false => random_coord(rng),
            };
            game.pick_piece(player, line, random_coord(rng))
        }
        3..=6 => {
            let direction = random_direction(rng);
            let possible = game.is_move_possible(direction);
            let result = game.move_piece(direction);
            assert_eq!(possible, result.is_ok(), "is_move_possible disagrees with move_piece");
            result
        }
        7 => game.swap_piece(random_coord(rng), random_coord(rng)),
        8 => game.cancel_step(),
        _ => {
            if rng.random_bool(0.3) {
                game.cancel_movement()
            } else {
                game.cancel_step()
            }
        }
    };

    if result.is_err() {
        assert_eq!(*game, before, "rejected operation changed the game");
    }

    for size in Size::all() {
        assert_eq!(pieces_of(game, size), 4, "piece of size {:?} lost or created", size);
    }

    // A turn only changes hands when the held piece leaves the hand for good
    match (before.phase(), game.phase()) {
        (Phase::Turn(a), Phase::Turn(b)) if a != b => {
            assert_eq!(holder, Some(a));
            assert_eq!(game.picked_piece_owner(), None);
        }
        (Phase::Turn(a), Phase::Finished(w)) => {
            assert_eq!(a, w);
            assert_eq!(holder, Some(a));
        }
        _ => {}
    }

    if let Some(owner) = game.picked_piece_owner() {
        assert_eq!(game.turn(), Some(owner));
        let left = game.movement_left().unwrap();
        assert!((1..=3).contains(&left));
    }
    if game.winner().is_some() {
        assert_eq!(game.picked_piece_owner(), None);
    }
}

#[test]
fn random_setup_starts_south() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let game = random_setup(&mut rng);
        assert_eq!(game.phase(), Phase::Turn(Player::South));
        assert_eq!(game.board().piece_count(), 12);
    }
}

#[test]
fn random_operations_keep_invariants() {
    let mut rng = StdRng::seed_from_u64(0xb0_0c3);

    for _ in 0..200 {
        let mut game = random_setup(&mut rng);
        for _ in 0..400 {
            random_step(&mut game, &mut rng);
            if game.winner().is_some() {
                break;
            }
        }
    }
}

#[test]
fn random_operations_during_setup() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..100 {
        let mut game = Game::new();
        for _ in 0..200 {
            random_step(&mut game, &mut rng);
        }
    }
}

#[test]
fn cancel_movement_always_restores() {
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..200 {
        let mut game = random_setup(&mut rng);
        // Reach some mid-game position first
        for _ in 0..rng.random_range(0..120) {
            random_step(&mut game, &mut rng);
        }
        if game.winner().is_some() {
            continue;
        }
        if game.picked_piece_owner().is_some() {
            game.cancel_movement().unwrap();
        }
        let rest = game.clone();
        let player = game.turn().unwrap();
        let line = game.board().closest_occupied_line(player).unwrap() as i32;
        let Some(column) = (0..DIMENSION as i32).find(|&c| game.get_piece_size(line, c).is_some()) else {
            continue;
        };

        game.pick_piece(player, line, column).unwrap();
        // With two or more units left a step can only reach an empty cell,
        // so the piece stays in hand
        for _ in 0..rng.random_range(0..6) {
            if game.movement_left() == Some(1) {
                break;
            }
            let legal: Vec<Direction> = game.legal_directions().collect();
            let Some(&direction) = legal.choose(&mut rng) else {
                break;
            };
            game.move_piece(direction).unwrap();
        }
        game.cancel_movement().unwrap();
        assert_eq!(game, rest);
    }
}
