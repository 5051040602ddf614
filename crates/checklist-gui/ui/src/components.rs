mod error_notification;
mod todo_footer;
mod todo_header;
mod todo_item;
mod todo_list;
mod user_warning;

pub use error_notification::ErrorNotification;
pub use todo_footer::TodoFooter;
pub use todo_header::TodoHeader;
pub use todo_item::TodoItem;
pub use todo_list::TodoList;
pub use user_warning::UserWarning;
