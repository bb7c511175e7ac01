#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    pub number_of_translated_nodes: u32,
    pub number_of_interned_variables: u32,
    pub number_of_interned_functions: u32,
    pub number_of_cache_hits: u32,
    pub number_of_field_arrays: u32,
    pub number_of_z3_invocations: u32,
}

impl Statistics {
    pub fn measure_node(&mut self) {
        self.number_of_translated_nodes += 1;
    }

    pub fn measure_interned_variable(&mut self) {
        self.number_of_interned_variables += 1;
    }

    pub fn measure_interned_function(&mut self) {
        self.number_of_interned_functions += 1;
    }

    pub fn measure_cache_hit(&mut self) {
        self.number_of_cache_hits += 1;
    }

    pub fn measure_field_array(&mut self) {
        self.number_of_field_arrays += 1;
    }

    pub fn measure_invoke_z3(&mut self) {
        self.number_of_z3_invocations += 1;
    }
}
