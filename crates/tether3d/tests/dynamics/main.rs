mod hinge;
mod joint_chain;
mod prismatic;
