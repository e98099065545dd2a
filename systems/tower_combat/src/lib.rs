#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns targeting data into aim and firing commands.

use neon_defence_core::{Command, TowerId, TowerSnapshot, TowerTarget, TowerView};

/// Tower combat system that queues aim and firing commands for towers with targets.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::AimTower` for every assignment and
    /// `Command::FireProjectile` for assigned towers whose cooldown elapsed.
    ///
    /// Towers without a target emit nothing and keep their previous facing.
    pub fn handle(&mut self, towers: TowerView, targets: &[TowerTarget], out: &mut Vec<Command>) {
        if targets.is_empty() {
            return;
        }

        let towers = towers.into_vec();
        if towers.is_empty() {
            return;
        }

        self.scratch.clear();

        for target in targets {
            let Some(snapshot) = find_tower(&towers, target.tower) else {
                continue;
            };

            self.scratch.push(Command::AimTower {
                tower: target.tower,
                enemy: target.enemy,
            });
            if snapshot.is_ready() {
                self.scratch.push(Command::FireProjectile {
                    tower: target.tower,
                    target: target.enemy,
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn find_tower(towers: &[TowerSnapshot], tower: TowerId) -> Option<&TowerSnapshot> {
    towers
        .binary_search_by_key(&tower, |snapshot| snapshot.id)
        .ok()
        .map(|index| &towers[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use neon_defence_core::{CellCoord, EnemyId, WorldPoint};

    #[test]
    fn no_targets_means_no_commands() {
        let mut system = TowerCombat::new();
        let towers = TowerView::from_snapshots(vec![snapshot(1, 0.0)]);
        let mut out = Vec::new();

        system.handle(towers, &[], &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn ready_towers_aim_and_fire() {
        let mut system = TowerCombat::new();
        let towers = TowerView::from_snapshots(vec![snapshot(5, 0.0), snapshot(2, -3.0)]);
        let targets = vec![target(2, 4), target(5, 1)];
        let mut out = Vec::new();

        system.handle(towers, &targets, &mut out);

        assert_eq!(
            out,
            vec![
                Command::AimTower {
                    tower: TowerId::new(2),
                    enemy: EnemyId::new(4),
                },
                Command::FireProjectile {
                    tower: TowerId::new(2),
                    target: EnemyId::new(4),
                },
                Command::AimTower {
                    tower: TowerId::new(5),
                    enemy: EnemyId::new(1),
                },
                Command::FireProjectile {
                    tower: TowerId::new(5),
                    target: EnemyId::new(1),
                },
            ],
        );
    }

    #[test]
    fn cooling_towers_only_aim_and_unknown_towers_are_skipped() {
        let mut system = TowerCombat::new();
        let towers = TowerView::from_snapshots(vec![snapshot(3, 250.0), snapshot(8, 0.0)]);
        let targets = vec![target(3, 9), target(8, 2), target(42, 3)];
        let mut out = Vec::new();

        system.handle(towers, &targets, &mut out);

        assert_eq!(
            out,
            vec![
                Command::AimTower {
                    tower: TowerId::new(3),
                    enemy: EnemyId::new(9),
                },
                Command::AimTower {
                    tower: TowerId::new(8),
                    enemy: EnemyId::new(2),
                },
                Command::FireProjectile {
                    tower: TowerId::new(8),
                    target: EnemyId::new(2),
                },
            ],
        );
    }

    fn snapshot(tower: u32, cooldown_ms: f32) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(tower),
            cell: CellCoord::new(0, 0),
            position: WorldPoint::new(0.0, 0.0),
            range: 120.0,
            cooldown_ms,
            facing: 0.0,
        }
    }

    fn target(tower: u32, enemy: u32) -> TowerTarget {
        TowerTarget {
            tower: TowerId::new(tower),
            enemy: EnemyId::new(enemy),
            tower_position: WorldPoint::new(0.0, 0.0),
            enemy_position: WorldPoint::new(0.0, 0.0),
            distance: 0.0,
        }
    }
}
