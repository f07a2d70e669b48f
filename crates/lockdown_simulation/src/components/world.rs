//! Позиционирование в мире: PatrolRoute

use bevy::prelude::*;

/// Маршрут патруля (циклический, wraparound index)
///
/// Пустой маршрут: не ошибка: Patrol просто держит позицию.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct PatrolRoute {
    pub waypoints: Vec<Vec3>,
    pub current: usize,
}

impl PatrolRoute {
    pub fn new(waypoints: Vec<Vec3>) -> Self {
        Self {
            waypoints,
            current: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn current_waypoint(&self) -> Option<Vec3> {
        if self.waypoints.is_empty() {
            return None;
        }
        self.waypoints.get(self.current % self.waypoints.len()).copied()
    }

    /// Следующая точка (после последней: снова первая)
    pub fn advance(&mut self) {
        if !self.waypoints.is_empty() {
            self.current = (self.current + 1) % self.waypoints.len();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_wraps_around() {
        let mut route = PatrolRoute::new(vec![Vec3::ZERO, Vec3::X, Vec3::Z]);
        assert_eq!(route.current_waypoint(), Some(Vec3::ZERO));

        route.advance();
        route.advance();
        assert_eq!(route.current_waypoint(), Some(Vec3::Z));

        route.advance();
        assert_eq!(route.current_waypoint(), Some(Vec3::ZERO));
    }

    #[test]
    fn test_empty_route_holds() {
        let mut route = PatrolRoute::default();
        route.advance();
        assert!(route.current_waypoint().is_none());
        assert_eq!(route.current, 0);
    }
}
