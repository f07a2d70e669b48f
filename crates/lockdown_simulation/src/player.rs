//! Snapshot игрока, который хост пишет перед каждым тиком

use bevy::prelude::*;

/// Состояние игрока глазами AI
///
/// Хост (level layer) владеет настоящим health/input игрока;
/// combat core видит только позицию и флаги.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerSnapshot {
    /// None: игрока нет на уровне (AI видит дистанцию +∞)
    pub position: Option<Vec3>,
    /// notarget: враги не замечают игрока
    pub notarget: bool,
    /// Попадания не наносят урон (god mode / cutscene)
    pub invulnerable: bool,
}

impl PlayerSnapshot {
    pub fn at(position: Vec3) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    /// Позиция для AI decisions (notarget прячет игрока)
    pub fn target_position(&self) -> Option<Vec3> {
        if self.notarget {
            None
        } else {
            self.position
        }
    }

    pub fn can_be_damaged(&self) -> bool {
        self.target_position().is_some() && !self.invulnerable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notarget_hides_player() {
        let mut player = PlayerSnapshot::at(Vec3::ONE);
        assert_eq!(player.target_position(), Some(Vec3::ONE));

        player.notarget = true;
        assert_eq!(player.target_position(), None);
        assert!(!player.can_be_damaged());
    }

    #[test]
    fn test_invulnerable_is_visible_but_not_damageable() {
        let player = PlayerSnapshot {
            invulnerable: true,
            ..PlayerSnapshot::at(Vec3::ZERO)
        };
        assert!(player.target_position().is_some());
        assert!(!player.can_be_damaged());
    }
}
