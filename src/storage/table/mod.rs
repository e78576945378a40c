pub mod row;
pub mod table_image;
