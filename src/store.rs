use crate::dlog;
use crate::types::{SortKey, Workout};

/// Ordered, in-memory workout collection. Ids are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutStore {
    workouts: Vec<Workout>,
}

impl WorkoutStore {
    pub const fn new() -> Self {
        Self {
            workouts: Vec::new(),
        }
    }

    pub fn from_workouts(workouts: impl IntoIterator<Item = Workout>) -> Self {
        let mut store = Self::new();
        for w in workouts {
            store.add(w);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Workout> {
        self.workouts.iter()
    }

    pub fn as_slice(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn get(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Append `workout` and return the id it is stored under.
    ///
    /// A colliding id becomes `"<id>-<n>"` with the lowest free `n`.
    pub fn add(&mut self, mut workout: Workout) -> String {
        if self.contains(&workout.id) {
            let base = workout.id.clone();
            let mut n = 1u32;
            while self.contains(&format!("{base}-{n}")) {
                n += 1;
            }
            workout.id = format!("{base}-{n}");
            dlog!("store_id_collision base={base} assigned={}", workout.id);
        }
        let id = workout.id.clone();
        self.workouts.push(workout);
        id
    }

    /// Remove the workout with `id`. Unknown ids are a no-op.
    pub fn remove(&mut self, id: &str) -> Option<Workout> {
        let pos = self.workouts.iter().position(|w| w.id == id)?;
        Some(self.workouts.remove(pos))
    }

    /// Swap in `workout` for the entry with the same id, in place.
    pub fn replace(&mut self, workout: Workout) -> Option<Workout> {
        let slot = self.workouts.iter_mut().find(|w| w.id == workout.id)?;
        Some(std::mem::replace(slot, workout))
    }

    pub fn clear(&mut self) {
        self.workouts.clear();
    }

    /// Stable ascending sort.
    pub fn sort_by(&mut self, key: SortKey) {
        match key {
            SortKey::Distance => self
                .workouts
                .sort_by(|a, b| a.distance().total_cmp(&b.distance())),
            SortKey::Date => self.workouts.sort_by_key(Workout::date),
        }
    }
}

impl<'a> IntoIterator for &'a WorkoutStore {
    type Item = &'a Workout;
    type IntoIter = std::slice::Iter<'a, Workout>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coords, WorkoutKind};
    use chrono::{TimeZone, Utc};

    fn run(ms: i64, distance: f64) -> Workout {
        let date = Utc.timestamp_millis_opt(ms).single().unwrap();
        Workout::create_at(
            WorkoutKind::Running,
            Coords::new(51.5, -0.1).unwrap(),
            distance,
            30.0,
            170.0,
            date,
        )
        .unwrap()
    }

    fn ids(store: &WorkoutStore) -> Vec<&str> {
        store.iter().map(Workout::id).collect()
    }

    #[test]
    fn add_keeps_ids_unique() {
        let mut store = WorkoutStore::new();
        assert_eq!(store.add(run(1_000, 5.0)), "1000");
        assert_eq!(store.add(run(1_000, 6.0)), "1000-1");
        assert_eq!(store.add(run(1_000, 7.0)), "1000-2");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn remove_takes_exactly_one_and_keeps_order() {
        let mut store = WorkoutStore::from_workouts([
            run(1_000, 5.0),
            run(2_000, 3.0),
            run(3_000, 8.0),
        ]);
        let removed = store.remove("2000").unwrap();
        assert_eq!(removed.distance(), 3.0);
        assert_eq!(ids(&store), ["1000", "3000"]);
        assert!(store.remove("2000").is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn sort_by_distance_is_stable() {
        let mut store = WorkoutStore::from_workouts([
            run(1_000, 5.0),
            run(2_000, 3.0),
            run(3_000, 5.0),
            run(4_000, 1.0),
        ]);
        store.sort_by(SortKey::Distance);
        assert_eq!(ids(&store), ["4000", "2000", "1000", "3000"]);

        let once = store.clone();
        store.sort_by(SortKey::Distance);
        assert_eq!(store, once);
    }

    #[test]
    fn sort_by_date_restores_creation_order() {
        let mut store =
            WorkoutStore::from_workouts([run(3_000, 1.0), run(1_000, 2.0), run(2_000, 3.0)]);
        store.sort_by(SortKey::Date);
        assert_eq!(ids(&store), ["1000", "2000", "3000"]);
    }

    #[test]
    fn replace_keeps_position() {
        let mut store = WorkoutStore::from_workouts([run(1_000, 5.0), run(2_000, 3.0)]);
        let edited = store
            .get("1000")
            .unwrap()
            .revise(WorkoutKind::Running, 10.0, 50.0, 180.0)
            .unwrap();
        store.replace(edited).unwrap();
        assert_eq!(ids(&store), ["1000", "2000"]);
        assert_eq!(store.get("1000").unwrap().distance(), 10.0);
    }

    #[test]
    fn clear_empties() {
        let mut store = WorkoutStore::from_workouts([run(1_000, 5.0)]);
        store.clear();
        assert!(store.is_empty());
    }
}
