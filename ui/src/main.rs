fn main() {
    trip_replay::main();
}
