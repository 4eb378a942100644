pub mod workspace_ops;
