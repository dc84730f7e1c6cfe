pub mod instruction_footer;
pub mod selection_list;
