//! Application context: owns the store and wires user events to store
//! mutations, persistence and view rebuilds.

use crate::blob::BlobStore;
use crate::dlog;
use crate::error::{AppError, WorkoutError};
use crate::location::LocationProvider;
use crate::persistence::WorkoutRepository;
use crate::store::WorkoutStore;
use crate::types::{Coords, SortKey, Workout, WorkoutKind, create_workout};
use crate::view::{
    Bounds, DEFAULT_ZOOM, FormInput, MapView, Surface, TILE_ATTRIBUTION, TILE_URL,
    list_item_for, marker_for,
};

pub const POSITION_ALERT: &str = "Could not get your position";

/// What an open form will do on submit.
#[derive(Debug, Clone, PartialEq)]
pub enum FormTarget {
    /// New workout at the clicked map location.
    New(Coords),
    /// Revise the workout with this id.
    Edit(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    Hidden,
    Open(FormTarget),
    Invalid(FormTarget, WorkoutError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// No form was open.
    Ignored,
    /// Input failed validation; the form stays open with the error shown.
    Rejected(WorkoutError),
    /// Stored and persisted under this id.
    Saved(String),
}

pub struct App<B, M, S> {
    store: WorkoutStore,
    repo: WorkoutRepository<B>,
    map: M,
    surface: S,
    map_ready: bool,
    form: FormState,
}

impl<B, M, S> App<B, M, S>
where
    B: BlobStore,
    M: MapView,
    S: Surface,
{
    /// Restore saved workouts and render the list. The map stays inert until
    /// [`App::boot`] obtains a position.
    ///
    /// Entries that had to be dropped, given an id/date, or renamed to keep ids
    /// unique are written back once, so ids stay stable across reloads.
    pub fn load(mut repo: WorkoutRepository<B>, map: M, surface: S) -> Result<Self, AppError> {
        let loaded = repo.load_checked()?;
        let saved_ids: Vec<String> = loaded.workouts.iter().map(|w| w.id().to_string()).collect();
        let store = WorkoutStore::from_workouts(loaded.workouts);
        tracing::info!(workouts = store.len(), key = repo.key(), "loaded workouts");

        let renamed = store.iter().zip(&saved_ids).any(|(w, id)| w.id() != id);
        if loaded.repaired || renamed {
            repo.save(store.as_slice())?;
            tracing::info!(key = repo.key(), "rewrote repaired workouts");
        }

        let mut app = Self {
            store,
            repo,
            map,
            surface,
            map_ready: false,
            form: FormState::Hidden,
        };
        app.render();
        Ok(app)
    }

    /// Ask for the user's position once. On failure the map stays inert and
    /// only list operations do anything visible.
    pub fn boot(&mut self, location: &mut impl LocationProvider) {
        match location.current_position() {
            Ok(here) => {
                self.map.set_view(here, DEFAULT_ZOOM, false);
                self.map.add_tile_layer(TILE_URL, TILE_ATTRIBUTION);
                self.map_ready = true;
                tracing::info!(at = %here, "map ready");
                self.render();
            }
            Err(e) => {
                tracing::warn!(err = %e, "could not get position");
                self.surface.alert(POSITION_ALERT);
            }
        }
    }

    pub const fn map_ready(&self) -> bool {
        self.map_ready
    }

    pub const fn store(&self) -> &WorkoutStore {
        &self.store
    }

    pub const fn form(&self) -> &FormState {
        &self.form
    }

    pub const fn map(&self) -> &M {
        &self.map
    }

    pub const fn surface(&self) -> &S {
        &self.surface
    }

    pub const fn repository(&self) -> &WorkoutRepository<B> {
        &self.repo
    }

    /// A click on empty map opens the new-workout form for that spot,
    /// replacing whatever the form was doing.
    pub fn on_map_click(&mut self, at: Coords) {
        if !self.map_ready {
            dlog!("map click ignored: map not ready");
            return;
        }
        self.surface.hide_error();
        self.surface.show_form(&FormInput::default());
        self.form = FormState::Open(FormTarget::New(at));
        dlog!("form open target=new at={at}");
    }

    pub fn on_kind_change(&mut self, kind: WorkoutKind) {
        self.surface.show_kind_fields(kind);
    }

    pub fn submit(&mut self, input: &FormInput) -> Result<SubmitOutcome, AppError> {
        let target = match &self.form {
            FormState::Hidden => return Ok(SubmitOutcome::Ignored),
            FormState::Open(t) | FormState::Invalid(t, _) => t.clone(),
        };

        let (distance, duration, extra) = input.numbers();
        let built = match &target {
            FormTarget::New(at) => create_workout(input.kind, *at, distance, duration, extra),
            FormTarget::Edit(id) => {
                let Some(current) = self.store.get(id) else {
                    self.close_form();
                    return Err(AppError::UnknownWorkout(id.clone()));
                };
                current.revise(input.kind, distance, duration, extra)
            }
        };

        let workout = match built {
            Ok(w) => w,
            Err(e) => {
                tracing::info!(err = %e, "workout input rejected");
                self.surface.show_error(&e);
                self.form = FormState::Invalid(target, e.clone());
                return Ok(SubmitOutcome::Rejected(e));
            }
        };

        let snapshot = self.store.clone();
        let id = match target {
            FormTarget::New(_) => self.store.add(workout),
            FormTarget::Edit(_) => {
                let id = workout.id().to_string();
                self.store.replace(workout);
                id
            }
        };
        self.commit(snapshot)?;
        self.close_form();
        tracing::info!(id = %id, "workout saved");
        Ok(SubmitOutcome::Saved(id))
    }

    pub fn dismiss_error(&mut self) {
        self.surface.hide_error();
        if let FormState::Invalid(target, _) = &self.form {
            self.form = FormState::Open(target.clone());
        }
    }

    /// Pan the map to a workout. Returns its location when the map moved.
    pub fn focus(&mut self, id: &str) -> Option<Coords> {
        let at = self.store.get(id)?.coords();
        if !self.map_ready {
            return None;
        }
        self.map.set_view(at, DEFAULT_ZOOM, true);
        Some(at)
    }

    /// Open the form prefilled with an existing workout.
    pub fn begin_edit(&mut self, id: &str) -> Result<FormInput, AppError> {
        let w = self
            .store
            .get(id)
            .ok_or_else(|| AppError::UnknownWorkout(id.to_string()))?;
        let prefill = FormInput::from_workout(w);
        self.surface.hide_error();
        self.surface.show_kind_fields(prefill.kind);
        self.surface.show_form(&prefill);
        self.form = FormState::Open(FormTarget::Edit(id.to_string()));
        Ok(prefill)
    }

    /// Delete one workout. Unknown ids are a no-op.
    pub fn delete(&mut self, id: &str) -> Result<Option<Workout>, AppError> {
        let snapshot = self.store.clone();
        let Some(removed) = self.store.remove(id) else {
            dlog!("delete ignored: unknown id={id}");
            return Ok(None);
        };
        self.commit(snapshot)?;
        if let FormState::Open(FormTarget::Edit(editing))
        | FormState::Invalid(FormTarget::Edit(editing), _) = &self.form
            && editing == id
        {
            self.close_form();
        }
        tracing::info!(id = %id, "workout deleted");
        Ok(Some(removed))
    }

    pub fn delete_all(&mut self) -> Result<(), AppError> {
        self.repo.clear()?;
        self.store.clear();
        self.render();
        tracing::info!("all workouts deleted");
        Ok(())
    }

    pub fn sort_by(&mut self, key: SortKey) -> Result<(), AppError> {
        let snapshot = self.store.clone();
        self.store.sort_by(key);
        self.commit(snapshot)?;
        dlog!("sorted by {key:?}");
        Ok(())
    }

    /// Fit the map around every workout. `None` when there is nothing to show
    /// or no map.
    pub fn zoom_to_fit(&mut self) -> Option<Bounds> {
        if !self.map_ready {
            return None;
        }
        let bounds = Bounds::covering(self.store.iter().map(Workout::coords))?;
        self.map.fit_bounds(bounds);
        Some(bounds)
    }

    /// Persist the current store, or roll back to `snapshot` and report.
    fn commit(&mut self, snapshot: WorkoutStore) -> Result<(), AppError> {
        if let Err(e) = self.repo.save(self.store.as_slice()) {
            tracing::warn!(err = %e, "save failed; rolling back");
            self.store = snapshot;
            return Err(e.into());
        }
        self.render();
        Ok(())
    }

    fn close_form(&mut self) {
        self.surface.hide_error();
        self.surface.hide_form();
        self.form = FormState::Hidden;
    }

    /// Rebuild list and markers from the store, in store order.
    fn render(&mut self) {
        self.surface.clear_list();
        for w in &self.store {
            self.surface.append_item(list_item_for(w));
        }
        if self.map_ready {
            self.map.clear_markers();
            for w in &self.store {
                self.map.add_marker(marker_for(w));
            }
        }
    }
}
