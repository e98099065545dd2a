//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use glam::Vec2;
use neon_defence_core::{CellCoord, TowerId, TowerSnapshot, WorldPoint};

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Cell occupied by the tower.
    pub(crate) cell: CellCoord,
    /// World-space centre derived from the cell.
    pub(crate) position: Vec2,
    /// Targeting radius in world units.
    pub(crate) range: f32,
    /// Milliseconds left before the tower may fire again.
    pub(crate) cooldown_ms: f32,
    /// Milliseconds between shots.
    pub(crate) fire_rate_ms: f32,
    /// Facing angle in radians.
    pub(crate) facing: f32,
}

impl TowerState {
    /// Counts the cooldown down. It may dip below zero once; readiness is a
    /// `<= 0` test.
    pub(crate) fn cool_down(&mut self, dt_ms: f32) {
        if self.cooldown_ms > 0.0 {
            self.cooldown_ms -= dt_ms;
        }
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.cooldown_ms <= 0.0
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            cell: self.cell,
            position: WorldPoint::new(self.position.x, self.position.y),
            range: self.range,
            cooldown_ms: self.cooldown_ms,
            facing: self.facing,
        }
    }
}

/// Registry that stores towers, tracks cell occupancy and allocates identifiers.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    occupancy: BTreeMap<CellCoord, TowerId>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            occupancy: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Inserts a new tower on `cell`. The caller is responsible for checking
    /// that the cell is free.
    pub(crate) fn insert(
        &mut self,
        cell: CellCoord,
        tile_length: f32,
        range: f32,
        fire_rate_ms: f32,
    ) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));

        let center = cell.center(tile_length);
        let _ = self.entries.insert(
            id,
            TowerState {
                id,
                cell,
                position: Vec2::new(center.x, center.y),
                range,
                cooldown_ms: 0.0,
                fire_rate_ms,
                facing: 0.0,
            },
        );
        let _ = self.occupancy.insert(cell, id);
        id
    }

    pub(crate) fn occupant(&self, cell: CellCoord) -> Option<TowerId> {
        self.occupancy.get(&cell).copied()
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
