use neon_defence_core::{CellCoord, Command, Event, MapRules, PlacementError, Rules, WorldPoint};
use neon_defence_system_builder::{Builder, BuilderInput};
use neon_defence_world::{self as world, query, World};

fn confirm_at(x: f32, y: f32) -> BuilderInput {
    BuilderInput::new(true, Some(WorldPoint::new(x, y)))
}

#[test]
fn confirm_emits_place_command_for_placeable_cell() {
    let mut builder = Builder::new(&MapRules::default());
    let mut commands = Vec::new();

    builder.handle(&[], confirm_at(60.0, 60.0), |_| None, &mut commands);

    assert_eq!(
        commands,
        vec![Command::PlaceTower {
            cell: CellCoord::new(1, 1),
        }],
        "builder should emit a placement command when confirming a valid cell",
    );
}

#[test]
fn confirm_ignored_when_cell_is_rejected() {
    let mut builder = Builder::new(&MapRules::default());
    let mut commands = Vec::new();

    builder.handle(
        &[],
        confirm_at(60.0, 60.0),
        |_| Some(PlacementError::Occupied),
        &mut commands,
    );

    assert!(commands.is_empty(), "rejected cell must not emit commands");
}

#[test]
fn hovering_without_confirm_is_silent() {
    let mut builder = Builder::new(&MapRules::default());
    let mut commands = Vec::new();

    builder.handle(
        &[],
        BuilderInput::new(false, Some(WorldPoint::new(60.0, 60.0))),
        |_| None,
        &mut commands,
    );

    assert!(commands.is_empty());
}

#[test]
fn confirm_outside_the_map_is_silent() {
    let mut builder = Builder::new(&MapRules::default());
    let mut commands = Vec::new();

    builder.handle(&[], confirm_at(-5.0, 60.0), |_| None, &mut commands);
    builder.handle(&[], BuilderInput::new(true, None), |_| None, &mut commands);

    assert!(commands.is_empty());
}

#[test]
fn builder_goes_quiet_after_game_over() {
    let mut builder = Builder::new(&MapRules::default());
    let mut commands = Vec::new();

    builder.handle(
        &[Event::GameOver { wave: 3 }],
        confirm_at(60.0, 60.0),
        |_| None,
        &mut commands,
    );
    builder.handle(&[], confirm_at(60.0, 60.0), |_| None, &mut commands);

    assert!(commands.is_empty());
}

#[test]
fn builder_commands_drive_the_world() {
    let mut world = World::new(Rules::default()).expect("default rules are valid");
    let mut builder = Builder::new(&query::rules(&world).map);
    let mut commands = Vec::new();
    let mut events = Vec::new();

    for point in [(60.0, 60.0), (60.0, 60.0), (100.0, 100.0)] {
        builder.handle(
            &events,
            confirm_at(point.0, point.1),
            |cell| query::placement_rejection(&world, cell),
            &mut commands,
        );
        events.clear();
        for command in commands.drain(..) {
            world::apply(&mut world, command, &mut events);
        }
    }

    assert_eq!(query::tower_count(&world), 1);
    assert_eq!(query::tower_at(&world, CellCoord::new(1, 1)).map(|id| id.get()), Some(0));
    assert_eq!(query::tower_at(&world, CellCoord::new(2, 2)), None);
    assert_eq!(query::status(&world).money, 50);
}
