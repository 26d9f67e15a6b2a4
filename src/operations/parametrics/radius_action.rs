use tracing::{debug, info};

use crate::error::{BrepEditError, Result};
use crate::topology::{FaceId, ShellId, TopologyStore};

use super::{Parametrics, ParametricsConfig};

/// Interactive radius change of one face.
///
/// Every new value runs a fresh edit session against the original shell.
/// A successful run is kept as a pending preview shell next to the
/// original; [`RadiusAction::commit`] makes it permanent and
/// [`RadiusAction::cancel`] throws it away. Pending shells are owned by the
/// action, so one of the two must be called to release them.
#[derive(Debug)]
pub struct RadiusAction {
    face: FaceId,
    shell: ShellId,
    pending: Option<ShellId>,
    config: ParametricsConfig,
}

impl RadiusAction {
    /// Starts a radius change of `face`, a face of `shell`.
    #[must_use]
    pub fn new(shell: ShellId, face: FaceId) -> Self {
        Self {
            face,
            shell,
            pending: None,
            config: ParametricsConfig::default(),
        }
    }

    /// Sets the tolerances used by the edit sessions.
    #[must_use]
    pub fn with_config(mut self, config: ParametricsConfig) -> Self {
        self.config = config;
        self
    }

    /// Radius of the original face, `0.0` if it has none.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is missing.
    pub fn current_radius(&self, store: &TopologyStore) -> Result<f64> {
        Ok(store.face(self.face)?.surface.radius().unwrap_or(0.0))
    }

    /// Twice [`RadiusAction::current_radius`].
    ///
    /// # Errors
    ///
    /// Returns an error if the face is missing.
    pub fn current_diameter(&self, store: &TopologyStore) -> Result<f64> {
        Ok(2.0 * self.current_radius(store)?)
    }

    /// Previews the face with `radius`.
    ///
    /// Returns `false` if the edit is rejected; the previous preview is
    /// discarded either way.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is missing entities of the shell.
    pub fn set_radius(&mut self, store: &mut TopologyStore, radius: f64) -> Result<bool> {
        if let Some(old) = self.pending.take() {
            store.remove_shell(old)?;
        }
        let mut session = Parametrics::with_config(store, self.shell, self.config)?;
        let outcome = session
            .modify_radius(self.face, radius)
            .and_then(|()| session.result());
        match outcome {
            Ok(outcome) => {
                debug!(radius, shell = ?outcome.shell, "radius preview ready");
                self.pending = Some(outcome.shell);
                Ok(true)
            }
            Err(err @ (BrepEditError::Edit(_) | BrepEditError::Operation(_))) => {
                debug!(radius, %err, "radius preview rejected");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Previews the face with `diameter`; see [`RadiusAction::set_radius`].
    ///
    /// # Errors
    ///
    /// Returns an error if the store is missing entities of the shell.
    pub fn set_diameter(&mut self, store: &mut TopologyStore, diameter: f64) -> Result<bool> {
        self.set_radius(store, diameter / 2.0)
    }

    /// The preview shell if there is one, else the original.
    #[must_use]
    pub fn active_shell(&self) -> ShellId {
        self.pending.unwrap_or(self.shell)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Replaces the original shell by the preview, in its solid if it has
    /// one, and removes the original. Returns the shell now in use.
    ///
    /// # Errors
    ///
    /// Returns an error if the original shell is missing.
    pub fn commit(self, store: &mut TopologyStore) -> Result<ShellId> {
        let Some(new) = self.pending else {
            return Ok(self.shell);
        };
        if let Some(solid) = store.solid_of_shell(self.shell) {
            store.solid_mut(solid)?.replace_shell(self.shell, new);
        }
        store.remove_shell(self.shell)?;
        info!(old = ?self.shell, new = ?new, "radius change committed");
        Ok(new)
    }

    /// Discards the preview, leaving the original shell in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the preview shell is missing.
    pub fn cancel(self, store: &mut TopologyStore) -> Result<()> {
        if let Some(p) = self.pending {
            store.remove_shell(p)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::creation::{MakeBox, MakeCylinder};
    use crate::topology::{FaceSurface, SolidId};

    fn cylinder(store: &mut TopologyStore) -> (SolidId, ShellId, FaceId) {
        let solid = MakeCylinder::new(Point3::origin(), 2.0, 1.0)
            .execute(store)
            .unwrap();
        let shell = store.solid(solid).unwrap().outer_shell;
        let face = store
            .shell(shell)
            .unwrap()
            .faces
            .iter()
            .copied()
            .find(|&f| matches!(store.face(f).unwrap().surface, FaceSurface::Cylinder(_)))
            .unwrap();
        (solid, shell, face)
    }

    #[test]
    fn reports_current_size() {
        let mut store = TopologyStore::new();
        let (_, shell, face) = cylinder(&mut store);
        let action = RadiusAction::new(shell, face);
        assert!((action.current_radius(&store).unwrap() - 2.0).abs() < 1e-12);
        assert!((action.current_diameter(&store).unwrap() - 4.0).abs() < 1e-12);

        let solid = MakeBox::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
            .execute(&mut store)
            .unwrap();
        let box_shell = store.solid(solid).unwrap().outer_shell;
        let plane = store.shell(box_shell).unwrap().faces[0];
        let action = RadiusAction::new(box_shell, plane);
        assert!(action.current_radius(&store).unwrap().abs() < 1e-12);
    }

    #[test]
    fn previews_replace_each_other() {
        let mut store = TopologyStore::new();
        let (_, shell, face) = cylinder(&mut store);
        let baseline = store.entity_counts();
        let mut action = RadiusAction::new(shell, face);

        assert!(action.set_radius(&mut store, 3.0).unwrap());
        let first = action.active_shell();
        assert!(action.set_diameter(&mut store, 5.0).unwrap());
        assert_ne!(action.active_shell(), first);
        assert!(store.shell(first).is_err());

        assert!(!action.set_radius(&mut store, -1.0).unwrap());
        assert!(!action.is_pending());
        assert_eq!(action.active_shell(), shell);
        assert_eq!(store.entity_counts(), baseline);
    }

    #[test]
    fn commit_swaps_the_solid_shell() {
        let mut store = TopologyStore::new();
        let (solid, shell, face) = cylinder(&mut store);
        let baseline = store.entity_counts();
        let mut action = RadiusAction::new(shell, face);
        assert!(action.set_diameter(&mut store, 3.0).unwrap());
        let new = action.commit(&mut store).unwrap();

        assert_ne!(new, shell);
        assert_eq!(store.solid(solid).unwrap().outer_shell, new);
        assert!(store.shell(shell).is_err());
        assert_eq!(store.entity_counts(), baseline);
        for &f in &store.shell(new).unwrap().faces {
            if let Some(r) = store.face(f).unwrap().surface.radius() {
                assert!((r - 1.5).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn cancel_keeps_the_original() {
        let mut store = TopologyStore::new();
        let (solid, shell, face) = cylinder(&mut store);
        let baseline = store.entity_counts();
        let mut action = RadiusAction::new(shell, face);
        assert!(action.set_radius(&mut store, 2.5).unwrap());
        action.cancel(&mut store).unwrap();
        assert_eq!(store.solid(solid).unwrap().outer_shell, shell);
        assert_eq!(store.entity_counts(), baseline);
    }
}
