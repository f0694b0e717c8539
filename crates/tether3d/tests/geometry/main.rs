mod compound_merge;
mod compound_ray_cast;
mod compound_split;
