pub struct MemoryScope;

impl MemoryScope {
    pub const REPORT: &'static str = "report";
}

pub struct SectionKeys;

impl SectionKeys {
    pub const OVERVIEW: &'static str = "overview";
    pub const GRAPH: &'static str = "graph";
}
