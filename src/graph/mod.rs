pub mod schedule_dag;
pub mod topo;

pub use schedule_dag::ScheduleDag;
pub use topo::topological_order;
