pub mod item_delegate;
