/// The already authenticated principal an operation runs on behalf of.
///
/// Authentication happens outside this crate; callers hand in the user
/// id they trust. Background and CLI work runs as the system actor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Option<i32>,
    is_system: bool,
}

impl Actor {
    pub fn user(user_id: i32) -> Self {
        Self {
            user_id: Some(user_id),
            is_system: false,
        }
    }

    pub fn system() -> Self {
        Self {
            user_id: None,
            is_system: true,
        }
    }

    pub fn is_system(&self) -> bool {
        self.is_system
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_constructors() {
        let user = Actor::user(12);
        assert_eq!(user.user_id, Some(12));
        assert!(!user.is_system());

        let system = Actor::system();
        assert_eq!(system.user_id, None);
        assert!(system.is_system());
    }
}
