//! UseCase: ユーザー一覧の取得

use std::sync::Arc;

use crate::domain::{RepositoryError, User, UserRepository};

/// ユーザー一覧取得のユースケース
pub struct ListUsersUseCase {
    user_repository: Arc<dyn UserRepository>,
}

impl ListUsersUseCase {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    pub async fn execute(&self) -> Result<Vec<User>, RepositoryError> {
        self.user_repository.list_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::UserId, infrastructure::repository::InMemoryUserRepository};

    fn user(id: &str, name: &str) -> User {
        User {
            id: UserId::new(id.to_string()).unwrap(),
            email: format!("{}@example.com", id),
            name: name.to_string(),
            profile_picture: None,
            online: false,
            last_seen: None,
        }
    }

    #[tokio::test]
    async fn test_list_users_returns_every_user_sorted_by_name() {
        // テスト項目: 呼び出し元を含む全ユーザーが名前順で返される
        // given (前提条件):
        let repository = InMemoryUserRepository::with_users(vec![
            user("u2", "Bob"),
            user("u1", "Alice"),
            user("u3", "Carol"),
        ]);
        let usecase = ListUsersUseCase::new(Arc::new(repository));

        // when (操作):
        let users = usecase.execute().await.unwrap();

        // then (期待する結果):
        let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    }

    #[tokio::test]
    async fn test_list_users_propagates_store_failure() {
        // テスト項目: ストア障害はそのままエラーとして返される
        // given (前提条件):
        let mut repository = crate::domain::MockUserRepository::new();
        repository
            .expect_list_all()
            .returning(|| Err(RepositoryError::Unavailable("down".to_string())));
        let usecase = ListUsersUseCase::new(Arc::new(repository));

        // when (操作):
        let result = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::Unavailable("down".to_string()))
        );
    }
}
