fn main() -> anyhow::Result<()> {
    flow_cubes::run()
}
