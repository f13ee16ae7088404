mod level;
mod node_tree;
mod raster;

pub use level::{generate_level, generate_level_layout, Level, LevelConfig, Room, RoomId};
pub use node_tree::{create_node_tree, GridPos, Node, NodeId, NodeTree};
pub use raster::{ellipse_points, line_points, round_half_up, vector_steps};
