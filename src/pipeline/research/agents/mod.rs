pub mod company_profiler;
