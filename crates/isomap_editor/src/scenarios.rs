//! End-to-end editing sessions run through the command history

use crate::brush::Brush;
use crate::commands::{
    CliffCommand, CommandHistory, ElevationCommand, ElevationMode, MutationCommand,
    PlaceObjectCommand, RemoveObjectsCommand,
};
use crate::refresh::RefreshArea;
use crate::testing::{catalog_of, cliff_catalog, straight_piece, TestMap};
use isomap_cliffs::{CliffSide, SearchLimits};
use isomap_core::{CellCoord, Direction, GridAccess, MapObject};
use isomap_ramps::{heights_settled, settle_terrain, RampClassifier, RampShape};
use std::sync::Arc;
use std::time::Duration;

fn limits() -> SearchLimits {
    SearchLimits {
        deadline: Duration::from_secs(5),
        max_expansions: 100_000,
    }
}

fn all_cells(map: &TestMap) -> Vec<CellCoord> {
    map.grid.cells().map(|c| c.coord).collect()
}

#[test]
fn raising_one_cell_builds_four_facing_ramps() {
    let mut map = TestMap::flat(5, 5);
    let mut history = CommandHistory::new();

    let raise = ElevationCommand::new(CellCoord::new(2, 2), Brush::default(), ElevationMode::Raise);
    assert!(history.execute(Box::new(raise), &mut map.ctx()));

    for coord in all_cells(&map) {
        let expected = if coord == CellCoord::new(2, 2) { 1 } else { 0 };
        assert_eq!(map.grid.height(coord), Some(expected), "{coord}");
    }
    for (x, y, toward) in [
        (2, 1, Direction::South),
        (3, 2, Direction::West),
        (2, 3, Direction::North),
        (1, 2, Direction::East),
    ] {
        assert_eq!(Some(map.tile(x, y)), map.ramp_tile(RampShape::Edge(toward)), "({x}, {y})");
    }
    for (x, y) in [(1, 1), (3, 1), (1, 3), (3, 3)] {
        assert_eq!(map.tile(x, y), 0, "diagonal ({x}, {y}) stays flat");
    }
    assert_eq!(
        map.notifier.last(),
        Some(RefreshArea::Around {
            center: CellCoord::new(2, 2),
            radius: 2
        })
    );
}

#[test]
fn raising_next_to_the_corner_keeps_the_border_flat() {
    let mut map = TestMap::flat(5, 5);
    let mut history = CommandHistory::new();

    let raise = ElevationCommand::new(CellCoord::new(1, 1), Brush::default(), ElevationMode::Raise);
    assert!(history.execute(Box::new(raise), &mut map.ctx()));

    assert_eq!(map.height(1, 1), 1);
    for (x, y) in [(0, 0), (2, 0), (0, 2), (2, 2)] {
        assert_eq!(map.tile(x, y), 0, "({x}, {y}) stays flat");
        assert_eq!(map.height(x, y), 0);
    }
    assert_eq!(Some(map.tile(1, 0)), map.ramp_tile(RampShape::Edge(Direction::South)));
    assert_eq!(Some(map.tile(0, 1)), map.ramp_tile(RampShape::Edge(Direction::East)));
}

#[test]
fn cliff_chain_runs_between_two_cells() {
    let mut map = TestMap::flat(8, 3);
    let mut history = CommandHistory::new();

    let mut command = CliffCommand::new(
        vec![CellCoord::new(0, 0), CellCoord::new(5, 0)],
        CliffSide::Front,
        Arc::new(cliff_catalog()),
        3,
    )
    .with_limits(limits());
    command.perform(&mut map.ctx());

    let path = command.path().unwrap();
    assert!(path.reached);
    assert_eq!(path.placements[0].placement, CellCoord::new(0, 0));
    assert_eq!(path.end(), Some(CellCoord::new(5, 0)));

    // Through the history the same command is undoable
    command.undo(&mut map.ctx());
    assert!(history.execute(Box::new(command), &mut map.ctx()));
    assert_eq!(history.undo_description(), Some("Draw Cliff"));
}

#[test]
fn lowering_diagonal_neighbours_sinks_the_cell_between() {
    let mut map = TestMap::plateau(5, 5, 1);
    let dug = [CellCoord::new(1, 1), CellCoord::new(3, 3)];
    for coord in dug {
        map.grid.set_height(coord, 0);
    }

    let classifier = RampClassifier::new(&map.tilesets, &map.ramps);
    let report = settle_terrain(&mut map.grid, &classifier, &[], &dug);

    assert_eq!(map.height(2, 2), 0);
    assert!(report.propagation.fixes.len() >= 2);
    assert!(report.classification.raised.is_empty());
    assert!(heights_settled(&map.grid, all_cells(&map)));
}

#[test]
fn cheaper_piece_beats_catalog_order_and_priority() {
    let mut map = TestMap::flat(8, 1);
    let mut costly = straight_piece(1, 5);
    costly.distance_modifier = 1.0;
    let mut cheap = straight_piece(2, 4);
    cheap.priority = 9;
    let catalog = Arc::new(catalog_of(vec![costly, cheap]));

    let mut command = CliffCommand::new(
        vec![CellCoord::new(0, 0), CellCoord::new(5, 0)],
        CliffSide::Front,
        catalog,
        0,
    )
    .with_limits(limits());
    command.perform(&mut map.ctx());

    for x in 0..6 {
        assert_eq!(Some(map.tile(x, 0)), map.cliff_tile(4), "x = {x}");
    }
}

#[test]
fn priority_decides_between_equal_costs() {
    let mut map = TestMap::flat(8, 1);
    let mut late = straight_piece(1, 6);
    late.priority = 3;
    let mut preferred = straight_piece(2, 7);
    preferred.priority = 1;
    let catalog = Arc::new(catalog_of(vec![late, preferred]));

    let mut command = CliffCommand::new(
        vec![CellCoord::new(0, 0), CellCoord::new(5, 0)],
        CliffSide::Front,
        catalog,
        0,
    )
    .with_limits(limits());
    command.perform(&mut map.ctx());

    for x in 0..6 {
        assert_eq!(Some(map.tile(x, 0)), map.cliff_tile(7), "x = {x}");
    }
}

#[test]
fn mixed_session_undoes_and_redoes_exactly() {
    let mut map = TestMap::flat(10, 10);
    let initial = map.grid.clone();
    let mut history = CommandHistory::new();
    let catalog = Arc::new(cliff_catalog());

    let tree = MapObject::TerrainObject {
        type_name: "TREE02".to_string(),
    };
    history.execute(
        Box::new(
            ElevationCommand::new(CellCoord::new(4, 4), Brush::square(3), ElevationMode::Raise)
                .with_amount(2),
        ),
        &mut map.ctx(),
    );
    history.execute(
        Box::new(
            CliffCommand::new(
                vec![CellCoord::new(0, 8), CellCoord::new(5, 8)],
                CliffSide::Front,
                catalog,
                9,
            )
            .with_limits(limits()),
        ),
        &mut map.ctx(),
    );
    history.execute(
        Box::new(PlaceObjectCommand::new(CellCoord::new(8, 1), tree)),
        &mut map.ctx(),
    );
    history.execute(
        Box::new(ElevationCommand::new(CellCoord::new(4, 4), Brush::default(), ElevationMode::Lower)),
        &mut map.ctx(),
    );
    assert_eq!(history.undo_len(), 4);
    assert!(heights_settled(&map.grid, all_cells(&map)));

    let final_grid = map.grid.clone();
    while history.undo(&mut map.ctx()) {}
    assert_eq!(map.grid, initial);
    assert!(map.objects.is_empty());

    while history.redo(&mut map.ctx()) {}
    assert_eq!(map.grid, final_grid);
    assert_eq!(map.objects.len(), 1);
}

#[test]
fn removing_objects_round_trips_through_history() {
    let mut map = TestMap::flat(6, 6);
    let mut history = CommandHistory::new();
    let smudge = MapObject::Smudge {
        smudge_type: "SC1".to_string(),
    };
    let id = map.objects.place(CellCoord::new(2, 3), smudge.clone()).unwrap();

    assert!(history.execute(
        Box::new(RemoveObjectsCommand::new(CellCoord::new(2, 2), Brush::square(3), None)),
        &mut map.ctx(),
    ));
    assert!(map.objects.is_empty());

    history.undo(&mut map.ctx());
    assert_eq!(map.objects.get(id), Some((CellCoord::new(2, 3), &smudge)));
    history.redo(&mut map.ctx());
    assert!(map.objects.is_empty());

    // A brush over an empty area is not recorded
    assert!(!history.execute(
        Box::new(RemoveObjectsCommand::new(CellCoord::new(2, 2), Brush::square(3), None)),
        &mut map.ctx(),
    ));
    assert_eq!(history.undo_len(), 1);
}
