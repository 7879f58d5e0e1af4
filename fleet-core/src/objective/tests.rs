use super::*;
use crate::testkit::{docked, docked_ship, params, planet, ship, world, world_with};

fn intel<'a>(world: &'a World, cfg: &'a AgentConfig) -> Intel<'a> {
    Intel::new(world, cfg, Position::ORIGIN)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn settle_own_full_planet_without_threat_is_worthless() {
    let cfg = AgentConfig::default();
    let w = world(
        vec![docked(planet(1, 0, 30.0, 0.0, 5.0, 1), &[1])],
        vec![docked_ship(1, 0, 30.0, 6.0, 1), ship(9, 1, 200.0, 100.0)],
    );
    assert_eq!(settle_planet(1, &intel(&w, &cfg)), Some((0.0, 0)));
}

#[test]
fn settle_unowned_planet_scores_base_and_distance() {
    let cfg = AgentConfig::default();
    let w = world(
        vec![
            planet(1, -1, 30.0, 40.0, 5.0, 3),
            docked(planet(2, 0, -100.0, 0.0, 5.0, 4), &[1]),
        ],
        vec![docked_ship(1, 0, -100.0, 6.0, 2), ship(9, 1, 200.0, 100.0)],
    );
    // Half the planets are free, which does not beat the two-player threshold.
    let (score, capacity) = settle_planet(1, &intel(&w, &cfg)).expect("resolves");
    assert!(approx(score, 114.0), "score {score}");
    assert_eq!(capacity, 3);
}

#[test]
fn settle_boost_applies_while_most_planets_are_free() {
    let cfg = AgentConfig::default();
    let w = world(
        vec![
            planet(1, -1, 30.0, 40.0, 5.0, 3),
            planet(2, -1, 90.0, 40.0, 5.0, 3),
            planet(3, 1, -90.0, 40.0, 5.0, 3),
        ],
        vec![ship(1, 0, 0.0, 0.0), ship(9, 1, 200.0, 100.0)],
    );
    let (score, _) = settle_planet(1, &intel(&w, &cfg)).expect("resolves");
    assert!(approx(score, 514.0), "score {score}");
}

#[test]
fn settle_threatened_own_planet_calls_for_defenders() {
    let cfg = AgentConfig::default();
    let mut w = world(
        vec![
            planet(1, -1, 30.0, 40.0, 5.0, 3),
            docked(planet(2, 0, -100.0, 0.0, 5.0, 4), &[1]),
        ],
        vec![
            docked_ship(1, 0, -100.0, 6.0, 2),
            ship(2, 0, 50.0, 50.0),
            ship(9, 1, -100.0, 12.0),
        ],
    );
    w.scan_nearby_enemies(cfg.nearby_enemy_radius);
    // free ratio 0.75 -> 112.5, one raider with two own ships -> 350 * 4,
    // distance 100 -> 7.
    let (score, capacity) = settle_planet(2, &intel(&w, &cfg)).expect("resolves");
    assert!(approx(score, 1519.5), "score {score}");
    assert_eq!(capacity, 3 + 2);
}

#[test]
fn settle_unknown_planet_is_invalid() {
    let cfg = AgentConfig::default();
    let w = world(vec![], vec![ship(1, 0, 0.0, 0.0)]);
    assert_eq!(settle_planet(4, &intel(&w, &cfg)), None);
}

#[test]
fn attack_ignores_unowned_and_own_planets() {
    let cfg = AgentConfig::default();
    let w = world(
        vec![
            planet(1, -1, 30.0, 40.0, 5.0, 3),
            docked(planet(2, 0, -100.0, 0.0, 5.0, 4), &[1]),
        ],
        vec![docked_ship(1, 0, -100.0, 6.0, 2), ship(9, 1, 200.0, 100.0)],
    );
    let intel = intel(&w, &cfg);
    assert_eq!(attack_planet(1, &intel), None);
    assert_eq!(attack_planet(2, &intel), None);

    let mut book = ObjectiveBook::new();
    book.insert(ObjectiveKind::AttackPlanet { planet: 1 });
    book.update_all(&intel);
    let objective = book.get(ObjectiveKey::Attack(1)).expect("inserted");
    assert!(!objective.is_valid());
    assert_eq!((objective.score(), objective.capacity()), (0.0, 0));
}

#[test]
fn attack_weighs_occupation_and_owner_strength() {
    let cfg = AgentConfig::default();
    let w = world_with(
        params(3, 10),
        vec![
            planet(1, -1, 200.0, 0.0, 5.0, 3),
            docked(planet(3, 1, 0.0, 50.0, 5.0, 2), &[20]),
        ],
        vec![
            ship(1, 0, 0.0, 0.0),
            ship(2, 0, 1.0, 0.0),
            docked_ship(20, 1, 0.0, 56.0, 3),
            ship(21, 1, 100.0, 100.0),
            ship(22, 1, 110.0, 100.0),
            ship(23, 1, 120.0, 100.0),
        ],
    );
    // distance 2 + occupy 40 + strength 40 * (sqrt(4) - 1)
    let (score, capacity) = attack_planet(3, &intel(&w, &cfg)).expect("enemy planet");
    assert!(approx(score, 82.0), "score {score}");
    // Two own ships is well under 2 * free * 4, so capacity follows the
    // defenders: one docked enemy, doubled.
    assert_eq!(capacity, 2);
}

#[test]
fn attack_turns_aggressive_once_nothing_is_free() {
    let cfg = AgentConfig::default();
    let mut w = world(
        vec![docked(planet(3, 1, 0.0, 50.0, 5.0, 2), &[20])],
        vec![
            ship(1, 0, 0.0, 0.0),
            docked_ship(20, 1, 0.0, 56.0, 3),
            ship(21, 1, 0.0, 60.0),
        ],
    );
    w.scan_nearby_enemies(cfg.nearby_enemy_radius);
    let (score, capacity) = attack_planet(3, &intel(&w, &cfg)).expect("enemy planet");
    // boost 500 + distance 2 + occupy 40 + sqrt(2) * 100; two players so no
    // strength term.
    assert!(approx(score, 542.0 + 2f64.sqrt() * 100.0), "score {score}");
    // One own ship, no free planets: 1 / 1 enemy planet + 2 nearby.
    assert_eq!(capacity, 3);
}

fn rush_world(turn: u32, enemy_x: f64, own: usize) -> World {
    let mut ships: Vec<Ship> = (1..=own as u32)
        .map(|id| ship(id, 0, -(id as f64), 0.0))
        .collect();
    ships.push(ship(20, 1, enemy_x, 0.0));
    ships.extend([
        ship(21, 1, 150.0, 100.0),
        ship(22, 1, 160.0, 100.0),
        ship(23, 1, 170.0, 100.0),
    ]);
    world_with(params(2, turn), vec![], ships)
}

#[test]
fn early_attack_fires_on_a_close_opponent() {
    let cfg = AgentConfig::default();
    let w = rush_world(5, 10.0, 3);
    assert_eq!(early_attack_target(&intel(&w, &cfg)), Some(20));

    let mut book = ObjectiveBook::new();
    book.insert(ObjectiveKind::EarlyAttack { target: None });
    book.update_all(&intel(&w, &cfg));
    let objective = book.get(ObjectiveKey::EarlyAttack).expect("inserted");
    assert!(objective.is_valid());
    assert_eq!(objective.score(), cfg.sentinel_score);
    assert_eq!(objective.capacity(), 3);
    assert_eq!(objective.kind(), &ObjectiveKind::EarlyAttack { target: Some(20) });
}

#[test]
fn early_attack_prefers_docked_enemies() {
    let cfg = AgentConfig::default();
    let w = world_with(
        params(2, 5),
        vec![docked(planet(1, 1, 30.0, 0.0, 3.0, 2), &[21])],
        vec![
            ship(1, 0, 0.0, 0.0),
            ship(2, 0, 0.0, 1.0),
            ship(3, 0, 0.0, 2.0),
            ship(20, 1, 5.0, 0.0),
            docked_ship(21, 1, 30.0, 4.0, 1),
        ],
    );
    assert_eq!(early_attack_target(&intel(&w, &cfg)), Some(21));
}

#[test]
fn early_attack_reach_shrinks_with_the_clock() {
    let cfg = AgentConfig::default();
    // (26 - 25) * 5 is below the floor of 15.
    assert_eq!(early_attack_target(&intel(&rush_world(25, 14.0, 3), &cfg)), Some(20));
    assert_eq!(early_attack_target(&intel(&rush_world(25, 20.0, 3), &cfg)), None);
    // Past the last rush turn the reach stays at the floor.
    assert_eq!(early_attack_target(&intel(&rush_world(40, 14.0, 3), &cfg)), Some(20));
}

#[test]
fn early_attack_needs_the_opening_fleet() {
    let cfg = AgentConfig::default();
    assert_eq!(early_attack_target(&intel(&rush_world(5, 10.0, 4), &cfg)), None);
    assert_eq!(early_attack_target(&intel(&rush_world(5, 10.0, 2), &cfg)), None);
}

#[test]
fn rally_triggers_for_small_fleets_late() {
    let cfg = AgentConfig::default();
    let w = rush_world(51, 100.0, 5);
    assert!(rally_needed(&intel(&w, &cfg)));
    let w = rush_world(50, 100.0, 5);
    assert!(!rally_needed(&intel(&w, &cfg)));
    let w = rush_world(51, 100.0, 6);
    assert!(!rally_needed(&intel(&w, &cfg)));
    let w = rush_world(101, 100.0, 8);
    assert!(rally_needed(&intel(&w, &cfg)));
}

#[test]
fn capacity_drop_to_zero_clears_roster_and_back_references() {
    let cfg = AgentConfig::default();
    let open = world(
        vec![planet(1, -1, 30.0, 0.0, 5.0, 3)],
        vec![ship(1, 0, 0.0, 0.0), ship(2, 0, 0.0, 2.0), ship(9, 1, 200.0, 100.0)],
    );
    let mut book = ObjectiveBook::new();
    book.insert(ObjectiveKind::SettlePlanet { planet: 1 });
    book.update_all(&intel(&open, &cfg));
    assert!(book.assign(1, ObjectiveKey::Settle(1)));
    assert!(book.assign(2, ObjectiveKey::Settle(1)));

    let full = world(
        vec![docked(planet(1, 0, 30.0, 0.0, 5.0, 2), &[1, 2])],
        vec![
            docked_ship(1, 0, 30.0, 6.0, 1),
            docked_ship(2, 0, 30.0, -6.0, 1),
            ship(9, 1, 200.0, 100.0),
        ],
    );
    let released = book.update_all(&intel(&full, &cfg));
    assert_eq!(released, vec![2, 1]);
    let objective = book.get(ObjectiveKey::Settle(1)).expect("kept");
    assert!(objective.assigned().is_empty());
    assert_eq!(objective.capacity(), 0);
    assert_eq!(book.objective_of(1), None);
    assert_eq!(book.objective_of(2), None);
}

#[test]
fn shrinking_capacity_releases_latest_assignments() {
    let cfg = AgentConfig::default();
    let ships = vec![
        ship(1, 0, 0.0, 0.0),
        ship(2, 0, 0.0, 2.0),
        ship(3, 0, 0.0, 4.0),
        ship(9, 1, 200.0, 100.0),
    ];
    let wide = world(vec![planet(1, -1, 30.0, 0.0, 5.0, 3)], ships.clone());
    let narrow = world(vec![planet(1, -1, 30.0, 0.0, 5.0, 2)], ships);

    let mut book = ObjectiveBook::new();
    book.insert(ObjectiveKind::SettlePlanet { planet: 1 });
    book.update_all(&intel(&wide, &cfg));
    for id in [2, 1, 3] {
        assert!(book.assign(id, ObjectiveKey::Settle(1)));
    }
    assert!(!book.assign(4, ObjectiveKey::Settle(1)), "objective is full");

    assert_eq!(book.update_all(&intel(&narrow, &cfg)), vec![3]);
    let objective = book.get(ObjectiveKey::Settle(1)).expect("kept");
    assert_eq!(objective.assigned(), &[2, 1]);
    assert_eq!(book.objective_of(3), None);
}

#[test]
fn objective_gone_sour_releases_its_roster() {
    let cfg = AgentConfig::default();
    let mut contested = world(
        vec![
            planet(1, -1, 200.0, 0.0, 5.0, 3),
            docked(planet(3, 1, 0.0, 50.0, 5.0, 2), &[20]),
        ],
        vec![
            ship(1, 0, 0.0, 0.0),
            docked_ship(20, 1, 0.0, 56.0, 3),
            ship(21, 1, 100.0, 100.0),
        ],
    );
    contested.scan_nearby_enemies(cfg.nearby_enemy_radius);
    let mut book = ObjectiveBook::new();
    book.insert(ObjectiveKind::AttackPlanet { planet: 3 });
    book.update_all(&intel(&contested, &cfg));
    // distance 2 + occupy 40 - one nearby defender 10
    let objective = book.get(ObjectiveKey::Attack(3)).expect("inserted");
    assert!(approx(objective.score(), 32.0), "score {}", objective.score());
    assert!(objective.is_available());
    assert!(book.assign(1, ObjectiveKey::Attack(3)));

    let mut fortified = world(
        vec![
            planet(1, -1, 200.0, 0.0, 5.0, 3),
            docked(planet(3, 1, 0.0, 50.0, 5.0, 2), &[20, 21]),
        ],
        vec![
            ship(1, 0, 0.0, 0.0),
            docked_ship(20, 1, 0.0, 56.0, 3),
            docked_ship(21, 1, 0.0, 44.0, 3),
            ship(22, 1, 3.0, 56.0),
            ship(23, 1, -3.0, 56.0),
        ],
    );
    fortified.scan_nearby_enemies(cfg.nearby_enemy_radius);
    let released = book.update_all(&intel(&fortified, &cfg));

    // Capacity grows with the defenders but the score is now below zero.
    let objective = book.get(ObjectiveKey::Attack(3)).expect("kept");
    assert!(approx(objective.score(), -18.0), "score {}", objective.score());
    assert_eq!(objective.capacity(), 12);
    assert_eq!(released, vec![1]);
    assert!(objective.assigned().is_empty());
    assert_eq!(book.objective_of(1), None);
}

#[test]
fn reassigning_moves_the_unit_between_rosters() {
    let cfg = AgentConfig::default();
    let w = world(
        vec![planet(1, -1, 30.0, 0.0, 5.0, 3), planet(2, -1, -30.0, 0.0, 5.0, 3)],
        vec![ship(1, 0, 0.0, 0.0), ship(9, 1, 200.0, 100.0)],
    );
    let mut book = ObjectiveBook::new();
    book.insert(ObjectiveKind::SettlePlanet { planet: 1 });
    book.insert(ObjectiveKind::SettlePlanet { planet: 2 });
    book.update_all(&intel(&w, &cfg));

    assert!(book.assign(1, ObjectiveKey::Settle(1)));
    assert!(book.assign(1, ObjectiveKey::Settle(2)));
    assert!(book.get(ObjectiveKey::Settle(1)).expect("kept").assigned().is_empty());
    assert_eq!(book.get(ObjectiveKey::Settle(2)).expect("kept").assigned(), &[1]);
    assert_eq!(book.objective_of(1), Some(ObjectiveKey::Settle(2)));

    assert_eq!(book.unassign(1), Some(ObjectiveKey::Settle(2)));
    assert_eq!(book.unassign(1), None);
}

#[test]
fn display_shows_score_and_roster() {
    let cfg = AgentConfig::default();
    let w = world(
        vec![planet(7, -1, 30.0, 40.0, 5.0, 6)],
        vec![ship(1, 0, 0.0, 0.0), ship(9, 1, 200.0, 100.0)],
    );
    let mut book = ObjectiveBook::new();
    book.insert(ObjectiveKind::SettlePlanet { planet: 7 });
    book.update_all(&intel(&w, &cfg));
    book.assign(1, ObjectiveKey::Settle(7));
    let text = book.get(ObjectiveKey::Settle(7)).expect("kept").to_string();
    assert_eq!(text, "Settle(7) [$=514.0, 1/6]");
}

#[test]
fn distance_penalties_follow_the_kind() {
    let w = world(
        vec![planet(1, -1, 30.0, 0.0, 5.0, 3)],
        vec![ship(1, 0, 0.0, 40.0), ship(9, 1, 200.0, 100.0)],
    );
    let unit = w.ship(1).expect("own ship");
    let settle = Objective::new(ObjectiveKind::SettlePlanet { planet: 1 });
    assert!(approx(settle.distance_penalty(unit, &w), 100.0));
    let rush = Objective::new(ObjectiveKind::EarlyAttack { target: Some(9) });
    assert_eq!(rush.distance_penalty(unit, &w), 0.0);
    let rally = Objective::new(ObjectiveKind::DefensiveRally { point: Position::ORIGIN });
    assert!(approx(rally.distance_penalty(unit, &w), 1600.0));
}
