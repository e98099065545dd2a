#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes nearest-enemy tower targets from world snapshots.

use neon_defence_core::{EnemyId, EnemyView, TowerId, TowerTarget, TowerView, WorldPoint};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    tower_workspace: Vec<TowerWorkspace>,
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// Each tower picks the nearest active enemy within its range. Candidates
    /// are scanned in spawn order and only a strictly closer enemy replaces
    /// the current pick, so ties go to the enemy that spawned first.
    ///
    /// The output buffer is cleared before populating it with the latest
    /// assignments.
    pub fn handle(&mut self, towers: &TowerView, enemies: &EnemyView, out: &mut Vec<TowerTarget>) {
        out.clear();

        self.prepare_tower_workspace(towers);
        if self.tower_workspace.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);
        if self.enemy_workspace.is_empty() {
            return;
        }

        for tower in &self.tower_workspace {
            if let Some(best) = nearest_within(tower, &self.enemy_workspace) {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: best.candidate.id,
                    tower_position: tower.position,
                    enemy_position: best.candidate.position,
                    distance: best.distance,
                });
            }
        }
    }

    fn prepare_tower_workspace(&mut self, towers: &TowerView) {
        self.tower_workspace.clear();
        let (lower, _) = towers.iter().size_hint();
        self.tower_workspace.reserve(lower);

        for snapshot in towers.iter() {
            if snapshot.range < 0.0 {
                continue;
            }

            self.tower_workspace.push(TowerWorkspace {
                id: snapshot.id,
                position: snapshot.position,
                range: snapshot.range,
            });
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.reserve(enemies.len());

        for snapshot in enemies.active() {
            self.enemy_workspace.push(EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
            });
        }
    }
}

fn nearest_within(tower: &TowerWorkspace, candidates: &[EnemyCandidate]) -> Option<BestCandidate> {
    let mut best: Option<BestCandidate> = None;

    for candidate in candidates {
        let distance = tower.position.distance(candidate.position);
        if distance > tower.range {
            continue;
        }

        let closer = best.map_or(true, |existing| distance < existing.distance);
        if closer {
            best = Some(BestCandidate {
                distance,
                candidate: *candidate,
            });
        }
    }

    best
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TowerWorkspace {
    id: TowerId,
    position: WorldPoint,
    range: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: WorldPoint,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance: f32,
    candidate: EnemyCandidate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use neon_defence_core::{CellCoord, EnemySnapshot, Health, TowerSnapshot};

    fn tower_view(snapshots: Vec<TowerSnapshot>) -> TowerView {
        TowerView::from_snapshots(snapshots)
    }

    fn enemy_view(snapshots: Vec<EnemySnapshot>) -> EnemyView {
        EnemyView::from_snapshots(snapshots)
    }

    fn tower_snapshot(id: u32, position: (f32, f32), range: f32) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            cell: CellCoord::new(0, 0),
            position: WorldPoint::new(position.0, position.1),
            range,
            cooldown_ms: 0.0,
            facing: 0.0,
        }
    }

    fn enemy_snapshot(id: u32, position: (f32, f32), active: bool) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            position: WorldPoint::new(position.0, position.1),
            health: Health::new(30),
            max_health: Health::new(30),
            path_index: 0,
            active,
        }
    }

    #[test]
    fn targets_enemy_within_range() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![tower_snapshot(1, (100.0, 100.0), 120.0)]);
        let enemies = enemy_view(vec![enemy_snapshot(2, (160.0, 180.0), true)]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);

        assert_eq!(out.len(), 1);
        let target = out[0];
        assert_eq!(target.tower, TowerId::new(1));
        assert_eq!(target.enemy, EnemyId::new(2));
        assert_eq!(target.tower_position, WorldPoint::new(100.0, 100.0));
        assert_eq!(target.enemy_position, WorldPoint::new(160.0, 180.0));
        assert!((target.distance - 100.0).abs() < 1e-4);
    }

    #[test]
    fn enemy_on_the_range_boundary_is_targeted() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![tower_snapshot(1, (0.0, 0.0), 120.0)]);
        let enemies = enemy_view(vec![enemy_snapshot(1, (120.0, 0.0), true)]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn enemy_outside_range_is_ignored() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![tower_snapshot(1, (0.0, 0.0), 120.0)]);
        let enemies = enemy_view(vec![enemy_snapshot(2, (400.0, 400.0), true)]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn nearest_enemy_wins() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![tower_snapshot(1, (0.0, 0.0), 200.0)]);
        let enemies = enemy_view(vec![
            enemy_snapshot(1, (150.0, 0.0), true),
            enemy_snapshot(2, (0.0, 90.0), true),
            enemy_snapshot(3, (100.0, 0.0), true),
        ]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);
        assert_eq!(out[0].enemy, EnemyId::new(2));
    }

    #[test]
    fn earlier_spawn_is_preferred_when_distances_match() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![tower_snapshot(1, (100.0, 100.0), 120.0)]);
        let enemies = enemy_view(vec![
            enemy_snapshot(20, (150.0, 100.0), true),
            enemy_snapshot(10, (50.0, 100.0), true),
        ]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].enemy, EnemyId::new(10));
    }

    #[test]
    fn inactive_enemies_are_never_targeted() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![tower_snapshot(1, (0.0, 0.0), 120.0)]);
        let enemies = enemy_view(vec![
            enemy_snapshot(1, (10.0, 0.0), false),
            enemy_snapshot(2, (100.0, 0.0), true),
        ]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].enemy, EnemyId::new(2));
    }

    #[test]
    fn empty_collections_produce_no_targets() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(Vec::new());
        let enemies = enemy_view(vec![enemy_snapshot(1, (1.0, 1.0), true)]);

        let mut out = vec![TowerTarget {
            tower: TowerId::new(99),
            enemy: EnemyId::new(99),
            tower_position: WorldPoint::default(),
            enemy_position: WorldPoint::default(),
            distance: 0.0,
        }];
        system.handle(&towers, &enemies, &mut out);
        assert!(out.is_empty());

        let towers = tower_view(vec![tower_snapshot(1, (0.0, 0.0), 120.0)]);
        let enemies = enemy_view(Vec::new());
        system.handle(&towers, &enemies, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn each_tower_targets_independently() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![
            tower_snapshot(1, (0.0, 0.0), 50.0),
            tower_snapshot(2, (500.0, 0.0), 50.0),
        ]);
        let enemies = enemy_view(vec![
            enemy_snapshot(1, (480.0, 0.0), true),
            enemy_snapshot(2, (30.0, 0.0), true),
        ]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!((out[0].tower, out[0].enemy), (TowerId::new(1), EnemyId::new(2)));
        assert_eq!((out[1].tower, out[1].enemy), (TowerId::new(2), EnemyId::new(1)));
    }
}
