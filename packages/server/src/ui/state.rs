//! Shared application state.

use std::sync::Arc;

use neighborly_shared::time::Clock;

use crate::{
    domain::{ConnectionRegistry, MessagePusher, MessageRepository, UserRepository},
    usecase::{
        CloseConnectionUseCase, GetHistoryUseCase, ListConversationsUseCase, ListUsersUseCase,
        MarkAsReadUseCase, NotifyTypingUseCase, OpenConnectionUseCase, PostMessageUseCase,
        PresenceTracker, RegisterUserUseCase, SendMessageUseCase,
    },
};

/// Shared application state
///
/// Built once at startup; every handler receives it through `State<Arc<AppState>>`.
pub struct AppState {
    /// MessagePusher（メッセージ通知の抽象化）
    pub message_pusher: Arc<dyn MessagePusher>,
    pub presence_tracker: Arc<PresenceTracker>,
    pub open_connection_usecase: OpenConnectionUseCase,
    pub register_user_usecase: RegisterUserUseCase,
    pub close_connection_usecase: CloseConnectionUseCase,
    pub send_message_usecase: SendMessageUseCase,
    pub notify_typing_usecase: NotifyTypingUseCase,
    pub list_conversations_usecase: ListConversationsUseCase,
    pub get_history_usecase: GetHistoryUseCase,
    pub mark_as_read_usecase: MarkAsReadUseCase,
    pub post_message_usecase: PostMessageUseCase,
    pub list_users_usecase: ListUsersUseCase,
}

impl AppState {
    /// Wire every use case to the given registry, stores, pusher and clock
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        user_repository: Arc<dyn UserRepository>,
        message_repository: Arc<dyn MessageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let presence_tracker = Arc::new(PresenceTracker::new(
            registry.clone(),
            user_repository.clone(),
            message_pusher.clone(),
            clock.clone(),
        ));

        Self {
            open_connection_usecase: OpenConnectionUseCase::new(message_pusher.clone()),
            register_user_usecase: RegisterUserUseCase::new(
                registry.clone(),
                message_pusher.clone(),
                presence_tracker.clone(),
            ),
            close_connection_usecase: CloseConnectionUseCase::new(
                registry.clone(),
                message_pusher.clone(),
                presence_tracker.clone(),
            ),
            send_message_usecase: SendMessageUseCase::new(
                registry.clone(),
                message_repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            ),
            notify_typing_usecase: NotifyTypingUseCase::new(registry, message_pusher.clone()),
            list_conversations_usecase: ListConversationsUseCase::new(
                user_repository.clone(),
                message_repository.clone(),
            ),
            get_history_usecase: GetHistoryUseCase::new(message_repository.clone()),
            mark_as_read_usecase: MarkAsReadUseCase::new(message_repository.clone()),
            post_message_usecase: PostMessageUseCase::new(
                user_repository.clone(),
                message_repository,
                clock,
            ),
            list_users_usecase: ListUsersUseCase::new(user_repository),
            message_pusher,
            presence_tracker,
        }
    }
}
